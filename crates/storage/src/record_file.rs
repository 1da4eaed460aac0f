//! JSON record files
//!
//! Each record store (registered identities, blacklist, backtrack requests)
//! is one JSON file holding an ordered array of records, pretty-printed with
//! two-space indentation.
//!
//! ## Write protocol
//!
//! ```text
//! serialize all records
//!   → write <file>.tmp
//!   → fsync (Strict only)
//!   → rename over <file>
//! ```
//!
//! The rename makes every rewrite all-or-nothing: a crash leaves either the
//! previous file or the new one, never a torn mix.
//!
//! ## Load protocol
//!
//! A missing file is created as `[]`. A file that does not parse fails with
//! [`Error::Corruption`]; records are never silently dropped.

use crate::durability::DurabilityMode;
use backtrack_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Typed handle on one record file
#[derive(Debug, Clone)]
pub struct RecordFile<T> {
    path: Option<PathBuf>,
    mode: DurabilityMode,
    _records: PhantomData<fn() -> T>,
}

impl<T> RecordFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind to `path` with the given durability.
    ///
    /// With [`DurabilityMode::None`] the path is ignored and the handle
    /// neither reads nor writes.
    pub fn new(path: impl Into<PathBuf>, mode: DurabilityMode) -> Self {
        let path = if mode.requires_disk() {
            Some(path.into())
        } else {
            None
        };
        Self {
            path,
            mode,
            _records: PhantomData,
        }
    }

    /// Handle that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            mode: DurabilityMode::None,
            _records: PhantomData,
        }
    }

    /// Backing path, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load all records, creating an empty file when missing.
    ///
    /// # Errors
    /// - `Corruption` if the file holds malformed JSON
    /// - `Io` on read/create failure
    pub fn load(&self) -> Result<Vec<T>> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };

        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            self.save(&[])?;
            debug!(path = %path.display(), "created empty record file");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<T> = serde_json::from_str(&content)
            .map_err(|e| Error::corruption(path.clone(), e.to_string()))?;
        debug!(path = %path.display(), count = records.len(), "loaded record file");
        Ok(records)
    }

    /// Atomically replace the file contents with `records`.
    pub fn save(&self, records: &[T]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(records)?;
        let tmp = tmp_path(path);
        {
            let mut file = File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.flush()?;
            if self.mode.requires_fsync() {
                file.sync_all()?;
            }
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
