//! Backtrack request types
//!
//! A request asks an operator to release the custody history of an object
//! to the person who reported it lost.
//!
//! ```text
//!            ┌──────────► approved   (history found)
//! pending ───┼──────────► failed     (no history)
//!            └──────────► rejected   (operator decision)
//! ```

use crate::types::{RequestId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Awaiting an operator decision
    Pending,
    /// Approved; `result` holds the object history
    Approved,
    /// Rejected by an operator
    Rejected,
    /// Approval attempted but no history existed
    Failed,
}

impl RequestStatus {
    /// Whether no further transition is allowed
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Stored name
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Failed => "failed",
        }
    }

    /// Parse a stored name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "approved" => Some(RequestStatus::Approved),
            "rejected" => Some(RequestStatus::Rejected),
            "failed" => Some(RequestStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A custody-history recovery request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktrackRequest {
    /// Request id (`req_N`)
    pub id: RequestId,
    /// Requesting person (usually a registered `Person_NNN`)
    pub person_id: String,
    /// Object label the person lost
    pub object_name: String,
    /// Evidence reference supplied with the request (e.g. a photo path)
    pub image_path: String,
    /// Lifecycle state
    pub status: RequestStatus,
    /// Creation time
    pub created_at: Timestamp,
    /// History on approval, diagnostic message on failure
    pub result: Option<serde_json::Value>,
}
