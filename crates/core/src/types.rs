//! Identifier and timestamp types
//!
//! This module defines the identifiers used throughout the system:
//! - [`PersonId`]: registered identity (`Person_NNN`)
//! - [`BlacklistId`]: blacklist entry (`BLACK_NNN`)
//! - [`RequestId`]: backtrack request (`req_N`)
//! - [`CameraId`]: camera source index
//!
//! The textual id formats are relied upon by existing consumers of the
//! record stores and must not change.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type: local wall-clock time, no zone
pub type Timestamp = NaiveDateTime;

/// Transition log timestamp format (`DD-MM-YYYY HH:MM:SS.ffffff`)
pub const LOG_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S%.6f";

/// Timestamp format used in formatted history lines
pub const HISTORY_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Current local time, truncated to the microsecond precision of the log
pub fn now() -> Timestamp {
    let t = chrono::Local::now().naive_local();
    t.with_nanosecond(t.nanosecond() / 1_000 * 1_000).unwrap_or(t)
}

macro_rules! sequenced_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $width:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Id prefix, including the separator
            pub const PREFIX: &'static str = $prefix;

            /// Build the id for a 1-based sequence number
            pub fn from_sequence(sequence: u64) -> Self {
                $name(format!("{}{:0width$}", $prefix, sequence, width = $width))
            }

            /// Sequence number encoded in the id, if it follows the format
            pub fn sequence(&self) -> Option<u64> {
                self.0.strip_prefix($prefix)?.parse().ok()
            }

            /// String form
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }
    };
}

sequenced_id!(
    /// Registered identity id, e.g. `Person_001`
    ///
    /// ```
    /// use backtrack_core::PersonId;
    ///
    /// let id = PersonId::from_sequence(7);
    /// assert_eq!(id.as_str(), "Person_007");
    /// assert_eq!(id.sequence(), Some(7));
    /// ```
    PersonId,
    "Person_",
    3
);

sequenced_id!(
    /// Blacklist entry id, e.g. `BLACK_001`
    BlacklistId,
    "BLACK_",
    3
);

sequenced_id!(
    /// Backtrack request id, e.g. `req_12`
    RequestId,
    "req_",
    0
);

/// Camera source index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraId(pub u32);

impl CameraId {
    /// Raw index
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CameraId {
    fn from(index: u32) -> Self {
        CameraId(index)
    }
}

/// Next sequence number for a store whose ids were built by `sequence`.
///
/// Returns one past the largest sequence seen, so a removed record never
/// frees its id. Equals `len + 1` for stores that never removed anything.
/// `None` when the largest sequence is already `u64::MAX`.
pub fn next_sequence<I>(sequences: I) -> Option<u64>
where
    I: IntoIterator<Item = Option<u64>>,
{
    sequences.into_iter().flatten().max().unwrap_or(0).checked_add(1)
}
