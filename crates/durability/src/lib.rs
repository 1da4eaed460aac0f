//! Durability layer for backtrack
//!
//! This crate owns the transition log:
//! - Log: append-only CSV of every transition group a camera emits
//! - Records: row encoding/decoding shared by writer and replay
//! - Recovery: rebuild timeline events from the log on open

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod log;
pub mod recovery;

pub use log::{LogRecord, LogSink, TransitionLog, LOG_HEADER};
pub use recovery::{events_from_record, replay, ReplayOptions, ReplayResult};
