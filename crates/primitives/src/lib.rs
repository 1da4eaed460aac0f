//! Shared stores for backtrack
//!
//! This crate provides the state every camera worker and query shares:
//! - EmbeddingStore: identity resolution and blacklist matching
//! - Timeline: per-object custody history backed by the transition log
//! - BacktrackRequests: pending/approved/rejected/failed recovery workflow
//!
//! Each store is `Send + Sync` and guarded by coarse locks; share them
//! with `Arc`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod distance;
pub mod identity;
pub mod requests;
pub mod timeline;

pub use identity::{EmbeddingStore, DEFAULT_THRESHOLD};
pub use requests::BacktrackRequests;
pub use timeline::{build_history, Timeline};
