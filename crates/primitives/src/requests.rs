//! Backtrack Request Workflow
//!
//! A person asks for the custody history of an object they lost. The
//! request starts `pending`; an operator approves or rejects it.
//!
//! ```text
//! pending ──approve──▶ approved   (history found)
//!    │       └───────▶ failed     (no history for the object)
//!    └─────reject────▶ rejected
//! ```
//!
//! Every transition is persisted before it is reported. If the write fails
//! the request keeps its previous state.
//!
//! Lock order: request lock, then timeline lock. The timeline never calls
//! back into this store.

use crate::timeline::Timeline;
use backtrack_core::{
    is_trackable, next_sequence, now, BacktrackRequest, Error, RequestId, RequestStatus, Result,
};
use backtrack_storage::{DurabilityMode, RecordFile};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

struct Inner {
    requests: Vec<BacktrackRequest>,
    next_sequence: u64,
    file: RecordFile<BacktrackRequest>,
}

/// Persistent request store bound to a timeline
pub struct BacktrackRequests {
    timeline: Arc<Timeline>,
    inner: Mutex<Inner>,
}

impl BacktrackRequests {
    /// Open the request store at `path`.
    ///
    /// # Errors
    /// - `Corruption` if the file is malformed
    pub fn open(
        path: impl AsRef<Path>,
        mode: DurabilityMode,
        timeline: Arc<Timeline>,
    ) -> Result<Self> {
        let file = RecordFile::new(path.as_ref(), mode);
        let requests: Vec<BacktrackRequest> = file.load()?;
        let next_sequence = next_sequence(requests.iter().map(|r| r.id.sequence()))
            .ok_or_else(|| Error::corruption(path.as_ref(), "request id sequence exhausted"))?;
        info!(requests = requests.len(), "request store opened");
        Ok(Self {
            timeline,
            inner: Mutex::new(Inner {
                requests,
                next_sequence,
                file,
            }),
        })
    }

    /// Store that never touches the disk
    pub fn in_memory(timeline: Arc<Timeline>) -> Self {
        Self {
            timeline,
            inner: Mutex::new(Inner {
                requests: Vec::new(),
                next_sequence: 1,
                file: RecordFile::in_memory(),
            }),
        }
    }

    /// File a new pending request.
    ///
    /// # Errors
    /// - `InvalidInput` if `person_id` is blank
    /// - `UnknownLabel` if `object_name` is not trackable
    pub fn create(
        &self,
        person_id: &str,
        object_name: &str,
        image_path: &str,
    ) -> Result<BacktrackRequest> {
        let person_id = person_id.trim();
        if person_id.is_empty() {
            return Err(Error::invalid_input("person id is empty"));
        }
        if !is_trackable(object_name) {
            return Err(Error::UnknownLabel {
                label: object_name.to_string(),
            });
        }

        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let following = inner
            .next_sequence
            .checked_add(1)
            .ok_or_else(|| Error::invalid_input("request id sequence exhausted"))?;
        let request = BacktrackRequest {
            id: RequestId::from_sequence(inner.next_sequence),
            person_id: person_id.to_string(),
            object_name: object_name.to_string(),
            image_path: image_path.to_string(),
            status: RequestStatus::Pending,
            created_at: now(),
            result: None,
        };

        inner.requests.push(request.clone());
        if let Err(e) = inner.file.save(&inner.requests) {
            inner.requests.pop();
            return Err(e);
        }
        inner.next_sequence = following;
        info!(id = %request.id, person = %request.person_id, object = %request.object_name, "request created");
        Ok(request)
    }

    /// Approve a pending request by looking up its object's history.
    ///
    /// Found: `approved` with the history as result. Not found: `failed`
    /// with a diagnostic; a request is never approved without history.
    pub fn approve(&self, id: &RequestId) -> Result<BacktrackRequest> {
        self.transition(id, RequestStatus::Approved, |request, timeline| {
            match timeline.history(&request.object_name) {
                Some(history) => {
                    let value = serde_json::to_value(&history)?;
                    Ok((RequestStatus::Approved, Some(value)))
                }
                None => Ok((
                    RequestStatus::Failed,
                    Some(serde_json::Value::String(format!(
                        "No history found for object '{}'",
                        request.object_name
                    ))),
                )),
            }
        })
    }

    /// Reject a pending request.
    pub fn reject(&self, id: &RequestId) -> Result<BacktrackRequest> {
        self.transition(id, RequestStatus::Rejected, |_, _| {
            Ok((RequestStatus::Rejected, None))
        })
    }

    /// Request by id
    pub fn get(&self, id: &RequestId) -> Option<BacktrackRequest> {
        self.inner
            .lock()
            .requests
            .iter()
            .find(|r| &r.id == id)
            .cloned()
    }

    /// All requests in creation order
    pub fn list(&self) -> Vec<BacktrackRequest> {
        self.inner.lock().requests.clone()
    }

    /// Requests currently in `status`
    pub fn list_by_status(&self, status: RequestStatus) -> Vec<BacktrackRequest> {
        self.inner
            .lock()
            .requests
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect()
    }

    /// Move a pending request to the state chosen by `decide`.
    ///
    /// `requested` only labels the error when the request is not pending.
    fn transition<F>(
        &self,
        id: &RequestId,
        requested: RequestStatus,
        decide: F,
    ) -> Result<BacktrackRequest>
    where
        F: FnOnce(&BacktrackRequest, &Timeline) -> Result<(RequestStatus, Option<serde_json::Value>)>,
    {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let index = inner
            .requests
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| Error::not_found(format!("request {}", id)))?;

        let current = inner.requests[index].clone();
        if current.status.is_terminal() {
            return Err(Error::InvalidTransition {
                id: id.to_string(),
                from: current.status.to_string(),
                to: requested.to_string(),
            });
        }

        let (status, result) = decide(&current, &self.timeline)?;
        let updated = BacktrackRequest {
            status,
            result,
            ..current.clone()
        };
        inner.requests[index] = updated.clone();
        if let Err(e) = inner.file.save(&inner.requests) {
            inner.requests[index] = current;
            return Err(e);
        }
        info!(id = %id, status = %updated.status, "request updated");
        Ok(updated)
    }
}
