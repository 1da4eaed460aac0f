//! Primitive types for Backtrack
//!
//! This module defines the canonical data structures for all primitives.
//! These types are shared between the `engine` and `primitives` crates.
//!
//! ## Design Principle
//!
//! - **backtrack-core** defines canonical semantic types (this module)
//! - **backtrack-primitives** provides the stores and workflow logic
//! - **backtrack-engine** drives them from camera workers

pub mod event;
pub mod identity;
pub mod request;

pub use event::{
    EventKind, ObjectHistory, PersonActivity, TimelineEvent, Transition, TransitionGroup,
};
pub use identity::{BlacklistMatch, BlacklistRecord, IdentityRecord};
pub use request::{BacktrackRequest, RequestStatus};
