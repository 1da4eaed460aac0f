//! Storage layer for Backtrack
//!
//! This crate implements the durable record files behind the stores:
//! - RecordFile: ordered JSON array per store, atomic rewrite, fail-fast load
//! - DurabilityMode: None / Buffered / Strict write guarantees

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod durability;
pub mod record_file;

pub use durability::DurabilityMode;
pub use record_file::RecordFile;
