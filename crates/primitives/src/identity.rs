//! Embedding Store: identity resolution and blacklist matching
//!
//! ## Design
//!
//! Two namespaces, registered identities and the blacklist, each guarded by
//! its own `Mutex` and persisted to its own JSON record file. Every
//! operation on a namespace holds that namespace's lock for its whole
//! duration, so a lookup followed by a registration is one atomic step and
//! two workers seeing the same new face register it once.
//!
//! ## Matching
//!
//! Nearest neighbour by Euclidean distance over raw coordinates. A distance
//! `<= threshold` is a match.
//!
//! ## Ids
//!
//! `Person_NNN` / `BLACK_NNN` from a per-namespace counter seeded with the
//! largest stored sequence plus one. Removing a blacklist entry never frees
//! its id.

use crate::distance::euclidean;
use backtrack_core::{
    next_sequence, now, BlacklistId, BlacklistMatch, BlacklistRecord, Error, IdentityRecord,
    PersonId, Result,
};
use backtrack_storage::{DurabilityMode, RecordFile};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Default match threshold
pub const DEFAULT_THRESHOLD: f32 = 0.7;

/// Record with an embedding and a sequenced id
trait Embedded {
    fn embedding(&self) -> &[f32];
    fn sequence(&self) -> Option<u64>;
}

impl Embedded for IdentityRecord {
    fn embedding(&self) -> &[f32] {
        &self.embedding
    }
    fn sequence(&self) -> Option<u64> {
        self.id.sequence()
    }
}

impl Embedded for BlacklistRecord {
    fn embedding(&self) -> &[f32] {
        &self.embedding
    }
    fn sequence(&self) -> Option<u64> {
        self.id.sequence()
    }
}

/// One persisted namespace
struct Namespace<T> {
    records: Vec<T>,
    next_sequence: u64,
    file: RecordFile<T>,
}

impl<T> Namespace<T>
where
    T: Embedded + Clone + Serialize + DeserializeOwned,
{
    fn load(file: RecordFile<T>) -> Result<Self> {
        let records = file.load()?;
        let path = || file.path().map(Path::to_path_buf).unwrap_or_default();
        if let Some(first) = records.first() {
            let dim = first.embedding().len();
            if let Some(bad) = records.iter().find(|r| r.embedding().len() != dim) {
                return Err(Error::corruption(
                    path(),
                    format!(
                        "mixed embedding dimensions: {} and {}",
                        dim,
                        bad.embedding().len()
                    ),
                ));
            }
        }
        let next_sequence = next_sequence(records.iter().map(Embedded::sequence))
            .ok_or_else(|| Error::corruption(path(), "id sequence exhausted"))?;
        Ok(Self {
            records,
            next_sequence,
            file,
        })
    }

    fn in_memory() -> Self {
        Self {
            records: Vec::new(),
            next_sequence: 1,
            file: RecordFile::in_memory(),
        }
    }

    /// Reject embeddings that cannot be compared with the stored ones
    fn validate(&self, embedding: &[f32]) -> Result<()> {
        if embedding.is_empty() {
            return Err(Error::invalid_input("embedding is empty"));
        }
        if embedding.iter().any(|v| !v.is_finite()) {
            return Err(Error::invalid_input("embedding has non-finite values"));
        }
        if let Some(first) = self.records.first() {
            let expected = first.embedding().len();
            if expected != embedding.len() {
                return Err(Error::DimensionMismatch {
                    expected,
                    got: embedding.len(),
                });
            }
        }
        Ok(())
    }

    fn nearest(&self, embedding: &[f32]) -> Option<(&T, f32)> {
        self.records
            .iter()
            .map(|r| (r, euclidean(r.embedding(), embedding)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Append and persist; the append is undone if the write fails
    fn push(&mut self, record: T) -> Result<()> {
        let following = self
            .next_sequence
            .checked_add(1)
            .ok_or_else(|| Error::invalid_input("id sequence exhausted"))?;
        self.records.push(record);
        if let Err(e) = self.file.save(&self.records) {
            self.records.pop();
            return Err(e);
        }
        self.next_sequence = following;
        Ok(())
    }
}

/// Thread-safe identity and blacklist store
pub struct EmbeddingStore {
    threshold: f32,
    registered: Mutex<Namespace<IdentityRecord>>,
    blacklist: Mutex<Namespace<BlacklistRecord>>,
}

impl EmbeddingStore {
    /// Open both namespaces from their record files.
    ///
    /// Missing files are created empty.
    ///
    /// # Errors
    /// - `InvalidInput` if `threshold` is negative or not finite
    /// - `Corruption` if either file is malformed
    pub fn open(
        registered_path: impl AsRef<Path>,
        blacklist_path: impl AsRef<Path>,
        mode: DurabilityMode,
        threshold: f32,
    ) -> Result<Self> {
        validate_threshold(threshold)?;
        let registered =
            Namespace::load(RecordFile::new(registered_path.as_ref(), mode))?;
        let blacklist = Namespace::load(RecordFile::new(blacklist_path.as_ref(), mode))?;
        info!(
            registered = registered.records.len(),
            blacklisted = blacklist.records.len(),
            threshold,
            "embedding store opened"
        );
        Ok(Self {
            threshold,
            registered: Mutex::new(registered),
            blacklist: Mutex::new(blacklist),
        })
    }

    /// Store that never touches the disk
    pub fn in_memory(threshold: f32) -> Result<Self> {
        validate_threshold(threshold)?;
        Ok(Self {
            threshold,
            registered: Mutex::new(Namespace::in_memory()),
            blacklist: Mutex::new(Namespace::in_memory()),
        })
    }

    /// Match threshold
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    // ========================================================================
    // Registered identities
    // ========================================================================

    /// Return the id of the nearest registered identity within threshold,
    /// registering a new identity when there is none.
    ///
    /// # Errors
    /// - `InvalidInput` / `DimensionMismatch` for unusable embeddings
    /// - `Io` if persisting a new identity fails (nothing is registered)
    pub fn resolve_or_register(&self, embedding: &[f32]) -> Result<PersonId> {
        let mut ns = self.registered.lock();
        ns.validate(embedding)?;

        if let Some((record, distance)) = ns.nearest(embedding) {
            if distance <= self.threshold {
                debug!(id = %record.id, distance, "resolved identity");
                return Ok(record.id.clone());
            }
        }

        let id = PersonId::from_sequence(ns.next_sequence);
        ns.push(IdentityRecord {
            id: id.clone(),
            embedding: embedding.to_vec(),
            registered_at: now(),
        })?;
        info!(id = %id, "registered new identity");
        Ok(id)
    }

    /// Read-only lookup; `None` when the store is empty or nothing is
    /// within threshold.
    pub fn match_registered(&self, embedding: &[f32]) -> Result<Option<PersonId>> {
        let ns = self.registered.lock();
        ns.validate(embedding)?;
        Ok(ns
            .nearest(embedding)
            .filter(|(_, distance)| *distance <= self.threshold)
            .map(|(record, _)| record.id.clone()))
    }

    /// Snapshot of all registered identities, in registration order
    pub fn registered(&self) -> Vec<IdentityRecord> {
        self.registered.lock().records.clone()
    }

    /// Number of registered identities
    pub fn len(&self) -> usize {
        self.registered.lock().records.len()
    }

    /// True when no identity is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every registered identity; numbering restarts at `Person_001`.
    pub fn clear_registered(&self) -> Result<()> {
        let mut ns = self.registered.lock();
        ns.file.save(&[])?;
        let removed = ns.records.len();
        ns.records.clear();
        ns.next_sequence = 1;
        info!(removed, "cleared registered identities");
        Ok(())
    }

    // ========================================================================
    // Blacklist
    // ========================================================================

    /// Add a blacklist entry.
    pub fn add_to_blacklist(&self, name: &str, embedding: &[f32]) -> Result<BlacklistId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_input("blacklist name is empty"));
        }
        let mut ns = self.blacklist.lock();
        ns.validate(embedding)?;

        let id = BlacklistId::from_sequence(ns.next_sequence);
        ns.push(BlacklistRecord {
            id: id.clone(),
            name: name.to_string(),
            embedding: embedding.to_vec(),
            blacklisted_at: now(),
        })?;
        info!(id = %id, name, "added blacklist entry");
        Ok(id)
    }

    /// Nearest blacklist entry; the best distance is reported even on a miss.
    pub fn match_blacklist(&self, embedding: &[f32]) -> Result<BlacklistMatch> {
        let ns = self.blacklist.lock();
        ns.validate(embedding)?;
        let Some((record, distance)) = ns.nearest(embedding) else {
            return Ok(BlacklistMatch::empty());
        };
        Ok(BlacklistMatch {
            record: (distance <= self.threshold).then(|| record.clone()),
            distance: Some(distance),
        })
    }

    /// Blacklist entries in insertion order
    pub fn list_blacklist(&self) -> Vec<BlacklistRecord> {
        self.blacklist.lock().records.clone()
    }

    /// Remove a blacklist entry.
    ///
    /// # Errors
    /// - `NotFound` if no entry has this id
    pub fn remove_from_blacklist(&self, id: &BlacklistId) -> Result<BlacklistRecord> {
        let mut ns = self.blacklist.lock();
        let index = ns
            .records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| Error::not_found(format!("blacklist entry {}", id)))?;

        let removed = ns.records.remove(index);
        if let Err(e) = ns.file.save(&ns.records) {
            ns.records.insert(index, removed);
            return Err(e);
        }
        info!(id = %id, "removed blacklist entry");
        Ok(removed)
    }
}

fn validate_threshold(threshold: f32) -> Result<()> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(Error::invalid_input(format!(
            "threshold must be a non-negative number, got {}",
            threshold
        )));
    }
    Ok(())
}
