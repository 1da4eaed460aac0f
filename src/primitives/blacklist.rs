//! Blacklist management.
//!
//! Blacklisted embeddings share the identity store's threshold. A camera
//! worker that resolves a face matching an entry raises an alert.

use crate::error::Result;
use crate::types::{BlacklistId, BlacklistRecord};
use backtrack_primitives::EmbeddingStore;
use std::sync::Arc;

/// Blacklist operations.
///
/// Access via `bt.blacklist`.
pub struct Blacklist {
    store: Arc<EmbeddingStore>,
}

impl Blacklist {
    pub(crate) fn new(store: Arc<EmbeddingStore>) -> Self {
        Self { store }
    }

    /// Blacklist a person under `name`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let id = bt.blacklist.add("Mallory", &embedding)?;
    /// assert_eq!(id.as_str(), "BLACK_001");
    /// ```
    pub fn add(&self, name: &str, embedding: &[f32]) -> Result<BlacklistId> {
        Ok(self.store.add_to_blacklist(name, embedding)?)
    }

    /// Nearest entry within threshold, if any.
    pub fn check(&self, embedding: &[f32]) -> Result<Option<BlacklistRecord>> {
        Ok(self.store.match_blacklist(embedding)?.record)
    }

    /// Entries in insertion order.
    pub fn list(&self) -> Vec<BlacklistRecord> {
        self.store.list_blacklist()
    }

    /// Remove an entry. Its id is never reused.
    ///
    /// # Errors
    /// - `NotFound` if no entry has this id
    pub fn remove(&self, id: &BlacklistId) -> Result<BlacklistRecord> {
        Ok(self.store.remove_from_blacklist(id)?)
    }
}
