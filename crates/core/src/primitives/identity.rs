//! Identity record types for the Embedding Store
//!
//! Field names match the JSON record stores written by earlier deployments.

use crate::types::{BlacklistId, PersonId, Timestamp};
use serde::{Deserialize, Serialize};

/// A registered person
///
/// Created the first time an unmatched face is seen; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Assigned id (`Person_NNN`)
    pub id: PersonId,
    /// Face embedding used for matching
    pub embedding: Vec<f32>,
    /// Registration time
    pub registered_at: Timestamp,
}

/// A blacklisted person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlacklistRecord {
    /// Assigned id (`BLACK_NNN`)
    pub id: BlacklistId,
    /// Operator-supplied name
    pub name: String,
    /// Face embedding used for matching
    pub embedding: Vec<f32>,
    /// When the entry was added
    pub blacklisted_at: Timestamp,
}

/// Result of a blacklist lookup
///
/// `distance` is the best distance found even when nothing matched, and
/// `None` only when the blacklist is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct BlacklistMatch {
    /// Matching record, if the best distance was within threshold
    pub record: Option<BlacklistRecord>,
    /// Distance to the nearest blacklist embedding
    pub distance: Option<f32>,
}

impl BlacklistMatch {
    /// Lookup against an empty blacklist
    pub fn empty() -> Self {
        Self {
            record: None,
            distance: None,
        }
    }

    /// Whether the lookup hit a record
    pub fn is_match(&self) -> bool {
        self.record.is_some()
    }
}
