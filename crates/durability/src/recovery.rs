//! Transition log replay
//!
//! Rebuilds timeline events from the transition log when a tracker opens.
//!
//! ## Replay Sequence
//!
//! 1. Read rows in file order, checking the header
//! 2. Decode each row; count malformed rows against the corruption budget
//! 3. Expand possession/abandonment rows into one event per label
//! 4. Stable-sort events by timestamp so per-object order is non-decreasing
//!
//! ## Key Principle
//!
//! A malformed log fails startup by default; records are never dropped
//! silently. [`ReplayOptions::permissive`] tolerates a bounded number of bad
//! rows and reports how many were skipped.

use crate::log::{csv_error, LogRecord, LOG_HEADER};
use backtrack_core::{Error, Result, TimelineEvent};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

// ============================================================================
// Replay Options
// ============================================================================

/// Log replay options
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    /// Maximum malformed rows to skip before failing
    pub max_corrupt_rows: usize,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self::strict()
    }
}

impl ReplayOptions {
    /// Fail on the first malformed row
    pub fn strict() -> Self {
        ReplayOptions {
            max_corrupt_rows: 0,
        }
    }

    /// Skip up to 100 malformed rows
    pub fn permissive() -> Self {
        ReplayOptions {
            max_corrupt_rows: 100,
        }
    }
}

// ============================================================================
// Replay Result
// ============================================================================

/// Log replay statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Data rows read (header excluded)
    pub rows_read: u64,
    /// Timeline events rebuilt
    pub events_replayed: u64,
    /// Person appear/leave rows (logged, not part of the timeline)
    pub person_rows: u64,
    /// Malformed rows skipped under a permissive budget
    pub corrupt_rows_skipped: u64,
    /// Replay time in microseconds
    pub replay_time_micros: u64,
}

impl ReplayResult {
    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "replayed {} events from {} rows ({} person rows, {} corrupt rows skipped) in {}us",
            self.events_replayed,
            self.rows_read,
            self.person_rows,
            self.corrupt_rows_skipped,
            self.replay_time_micros
        )
    }
}

/// Expand a decoded row into timeline events (empty for person rows)
pub fn events_from_record(record: &LogRecord) -> Vec<TimelineEvent> {
    let Some(kind) = record.transition.event_kind() else {
        return Vec::new();
    };
    let person = if kind.carries_person() {
        record.person.clone()
    } else {
        None
    };
    record
        .labels
        .iter()
        .map(|label| TimelineEvent {
            label: label.clone(),
            timestamp: record.timestamp,
            kind,
            person: person.clone(),
            camera: record.camera,
        })
        .collect()
}

/// Replay the log at `path`.
///
/// A missing file replays as empty.
///
/// # Errors
/// - `Corruption` if the header is wrong or malformed rows exceed the budget
/// - `Io` on read failure
pub fn replay(
    path: impl AsRef<Path>,
    options: &ReplayOptions,
) -> Result<(Vec<TimelineEvent>, ReplayResult)> {
    let path = path.as_ref();
    let started = Instant::now();
    let mut result = ReplayResult::default();

    if !path.exists() {
        debug!(path = %path.display(), "no transition log to replay");
        return Ok((Vec::new(), result));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let header = reader.headers().map_err(csv_error)?.clone();
    if !header.is_empty() && header.iter().ne(LOG_HEADER.iter().copied()) {
        return Err(Error::corruption(
            path,
            format!("unexpected header {:?}", header.iter().collect::<Vec<_>>()),
        ));
    }

    let mut events = Vec::new();
    for (index, row) in reader.records().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) if !e.is_io_error() => {
                skip_corrupt(path, line, &e.to_string(), &mut result, options)?;
                continue;
            }
            Err(e) => return Err(csv_error(e)),
        };
        result.rows_read += 1;

        let fields: Vec<&str> = row.iter().collect();
        match LogRecord::parse(&fields) {
            Ok(record) => {
                let expanded = events_from_record(&record);
                if expanded.is_empty() && record.transition.event_kind().is_none() {
                    result.person_rows += 1;
                }
                result.events_replayed += expanded.len() as u64;
                events.extend(expanded);
            }
            Err(message) => skip_corrupt(path, line, &message, &mut result, options)?,
        }
    }

    // Stable: rows with equal timestamps keep file order
    events.sort_by_key(|e| e.timestamp);

    result.replay_time_micros = started.elapsed().as_micros() as u64;
    info!(path = %path.display(), "{}", result.summary());
    Ok((events, result))
}

fn skip_corrupt(
    path: &Path,
    line: usize,
    message: &str,
    result: &mut ReplayResult,
    options: &ReplayOptions,
) -> Result<()> {
    if result.corrupt_rows_skipped as usize >= options.max_corrupt_rows {
        return Err(Error::corruption(path, format!("line {}: {}", line, message)));
    }
    result.corrupt_rows_skipped += 1;
    warn!(path = %path.display(), line, message, "skipping corrupt log row");
    Ok(())
}
