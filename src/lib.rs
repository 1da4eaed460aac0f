//! # Backtrack
//!
//! Cross-camera custody tracking for personal belongings.
//!
//! Camera workers detect faces and objects, resolve each face to a stable
//! `Person_NNN` identity, and log every change in who holds what. Any
//! object's chain of custody can then be queried, and a person who lost
//! something can file a request for it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use backtrack::prelude::*;
//!
//! let bt = Backtrack::open("./data")?;
//!
//! // One worker thread per camera
//! bt.start_camera(CameraId(0), webcam, models)?;
//! bt.set_alert_sink(|alert: &Alert| -> std::result::Result<(), AlertError> {
//!     eprintln!("ALERT: {}", alert);
//!     Ok(())
//! });
//!
//! // Who had the laptop last?
//! if let Some(history) = bt.objects.find_history("laptop")? {
//!     println!("{:?} at camera {}", history.last_person, history.current_camera);
//! }
//!
//! bt.shutdown();
//! ```
//!
//! ## Surfaces
//!
//! - [`Blacklist`] - Blacklisted identities that raise alerts
//! - [`Objects`] - Object history lookups, with polling
//! - [`Requests`] - Backtrack request workflow
//! - [`Config`] - TOML configuration with environment overrides

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod database;
mod error;
mod primitives;
mod types;

pub mod prelude;

// Re-export main entry points
pub use config::{
    Config, IdentityConfig, QueryConfig, StorageConfig, TrackingConfig, DEFAULT_CONFIG_FILE,
    ENV_DATA_DIR, ENV_THRESHOLD,
};
pub use database::{
    Backtrack, BacktrackBuilder, BLACKLIST_FILE, EMBEDDINGS_FILE, REQUESTS_FILE, TRACK_LOG_FILE,
};
pub use error::{Error, Result};

// Re-export surfaces
pub use primitives::{Blacklist, LostObject, Objects, Requests};

// Re-export types
pub use types::*;
