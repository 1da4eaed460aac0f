//! Convenient imports for Backtrack.
//!
//! ```ignore
//! use backtrack::prelude::*;
//!
//! let bt = Backtrack::open("./data")?;
//! ```

// Main entry point
pub use crate::database::{Backtrack, BacktrackBuilder};
pub use crate::config::Config;

// Error handling
pub use crate::error::{Error, Result};

// Surfaces
pub use crate::primitives::{Blacklist, LostObject, Objects, Requests};

// Core types
pub use crate::types::{
    BacktrackRequest, CameraId, EventKind, ObjectHistory, PersonActivity, PersonId, RequestId,
    RequestStatus,
};

// Tracking seams
pub use crate::types::{Alert, AlertError, AlertSink, FrameSource, Perception, PerceptionError};
