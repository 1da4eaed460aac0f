//! Tracking engine for backtrack
//!
//! Turns camera frames into custody transitions:
//! - Perception: frame source and model traits (external collaborators)
//! - Possession: which detected objects a person is holding
//! - Camera: per-camera state machine diffing tick against tick
//! - Alert: blacklist alert dispatch to a registered sink
//! - Worker / Tracker: one thread per camera, lifecycle and shutdown

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alert;
pub mod camera;
pub mod perception;
pub mod possession;
pub mod tracker;
pub mod worker;

pub use alert::{Alert, AlertDispatcher, AlertError, AlertSink, Delivery};
pub use camera::{CameraState, Observation};
pub use perception::{FrameSource, Perception, PerceptionError};
pub use possession::{is_near, partition, DEFAULT_PROXIMITY_THRESHOLD};
pub use tracker::{CameraHandle, Tracker};
pub use worker::{CameraWorker, TickOutcome, WorkerContext};
