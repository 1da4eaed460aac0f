//! Core types and traits for Backtrack
//!
//! This crate defines the foundational types used throughout the system:
//! - [`PersonId`], [`BlacklistId`], [`RequestId`], [`CameraId`]: identifiers
//! - [`BoundingBox`], [`FaceBox`], [`ObjectDetection`]: perception outputs
//! - [`TimelineEvent`], [`ObjectHistory`], [`Transition`]: custody timeline
//! - [`IdentityRecord`], [`BlacklistRecord`], [`BacktrackRequest`]: stored records
//! - [`Error`]: error type shared by every crate

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod geometry;
pub mod labels;
pub mod primitives;
pub mod types;

pub use error::{Error, Result};
pub use geometry::{BoundingBox, FaceBox, ObjectDetection};
pub use labels::{is_trackable, TRACKABLE_LABELS};
pub use primitives::{
    BacktrackRequest, BlacklistMatch, BlacklistRecord, EventKind, IdentityRecord, ObjectHistory,
    PersonActivity, RequestStatus, TimelineEvent, Transition, TransitionGroup,
};
pub use types::{
    next_sequence, now, BlacklistId, CameraId, PersonId, RequestId, Timestamp,
    HISTORY_TIMESTAMP_FORMAT, LOG_TIMESTAMP_FORMAT,
};
