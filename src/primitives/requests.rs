//! Backtrack request workflow.
//!
//! A person who lost something files a request; an operator approves it
//! (attaching the object's history) or rejects it.

use crate::error::Result;
use crate::types::{BacktrackRequest, RequestId, RequestStatus};
use backtrack_primitives::BacktrackRequests;
use std::sync::Arc;

/// Request operations.
///
/// Access via `bt.requests`.
pub struct Requests {
    store: Arc<BacktrackRequests>,
}

impl Requests {
    pub(crate) fn new(store: Arc<BacktrackRequests>) -> Self {
        Self { store }
    }

    /// File a pending request.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let req = bt.requests.create("Person_001", "backpack", "uploads/bag.jpg")?;
    /// assert_eq!(req.id.as_str(), "req_1");
    /// ```
    pub fn create(
        &self,
        person_id: &str,
        object_name: &str,
        image_path: &str,
    ) -> Result<BacktrackRequest> {
        Ok(self.store.create(person_id, object_name, image_path)?)
    }

    /// Approve a pending request.
    ///
    /// Ends `approved` with the history attached when the object has one,
    /// `failed` otherwise.
    ///
    /// # Errors
    /// - `NotFound` for an unknown id
    /// - `Conflict` if the request already left `pending`
    pub fn approve(&self, id: &RequestId) -> Result<BacktrackRequest> {
        Ok(self.store.approve(id)?)
    }

    /// Reject a pending request.
    pub fn reject(&self, id: &RequestId) -> Result<BacktrackRequest> {
        Ok(self.store.reject(id)?)
    }

    /// Request by id
    pub fn get(&self, id: &RequestId) -> Option<BacktrackRequest> {
        self.store.get(id)
    }

    /// All requests in creation order
    pub fn list(&self) -> Vec<BacktrackRequest> {
        self.store.list()
    }

    /// Requests in `status`
    pub fn list_by_status(&self, status: RequestStatus) -> Vec<BacktrackRequest> {
        self.store.list_by_status(status)
    }

    /// Requests awaiting a decision
    pub fn pending(&self) -> Vec<BacktrackRequest> {
        self.list_by_status(RequestStatus::Pending)
    }
}
