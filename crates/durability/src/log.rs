//! Append-only transition log
//!
//! One CSV row per transition group, in the column layout earlier
//! deployments wrote and downstream consumers parse:
//!
//! ```text
//! timestamp,camera,event_type,details
//! 09-03-2024 14:05:07.123456,0,person_detected,Person_001
//! 09-03-2024 14:05:07.123456,0,objects_with_person,"Person_001: backpack, laptop"
//! 09-03-2024 14:05:09.000412,0,objects_abandoned,backpack
//! ```
//!
//! `details` is `"<person>: <labels>"` for possession rows, `"<labels>"` for
//! abandonment rows and the bare person id for person rows; labels are
//! joined with `", "`.
//!
//! The encoding is a compatibility contract: rows must replay back into the
//! same timeline events (see [`crate::recovery`]).

use backtrack_core::{
    CameraId, Error, PersonId, Result, Timestamp, Transition, TransitionGroup,
    LOG_TIMESTAMP_FORMAT,
};
use backtrack_storage::DurabilityMode;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header row
pub const LOG_HEADER: [&str; 4] = ["timestamp", "camera", "event_type", "details"];

/// Format accepted when reading timestamps (any fraction length)
pub const LOG_TIMESTAMP_PARSE_FORMAT: &str = "%d-%m-%Y %H:%M:%S%.f";

/// Label separator inside `details`
const LABEL_SEPARATOR: &str = ", ";

/// Separator between person and labels inside `details`
const PERSON_SEPARATOR: &str = ": ";

/// Placeholder older writers used for a missing person
const NO_PERSON: &str = "None";

/// One decoded log row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// When the group was recorded
    pub timestamp: Timestamp,
    /// Observing camera
    pub camera: CameraId,
    /// Row kind
    pub transition: Transition,
    /// Person the row is attributed to
    pub person: Option<PersonId>,
    /// Object labels, empty for person rows
    pub labels: Vec<String>,
}

impl LogRecord {
    /// Build from a tick's transition group
    pub fn from_group(timestamp: Timestamp, camera: CameraId, group: &TransitionGroup) -> Self {
        Self {
            timestamp,
            camera,
            transition: group.transition,
            person: group.person.clone(),
            labels: group.labels.iter().cloned().collect(),
        }
    }

    /// The `details` column
    pub fn details(&self) -> String {
        let person = self
            .person
            .as_ref()
            .map(|p| p.as_str())
            .unwrap_or(NO_PERSON);
        let labels = self.labels.join(LABEL_SEPARATOR);
        match self.transition {
            Transition::PersonDetected | Transition::PersonLeft => person.to_string(),
            Transition::ObjectsWithPerson | Transition::ObjectsRemoved => {
                format!("{}{}{}", person, PERSON_SEPARATOR, labels)
            }
            Transition::ObjectsAbandoned | Transition::AbandonedObjectsPicked => labels,
        }
    }

    /// CSV fields in column order
    pub fn to_fields(&self) -> [String; 4] {
        [
            self.timestamp.format(LOG_TIMESTAMP_FORMAT).to_string(),
            self.camera.to_string(),
            self.transition.as_str().to_string(),
            self.details(),
        ]
    }

    /// Decode one row; the message describes the first malformed column
    pub fn parse(fields: &[&str]) -> std::result::Result<Self, String> {
        let [timestamp, camera, event_type, details] = fields else {
            return Err(format!("expected 4 columns, found {}", fields.len()));
        };

        let timestamp = Timestamp::parse_from_str(timestamp, LOG_TIMESTAMP_PARSE_FORMAT)
            .map_err(|e| format!("bad timestamp {:?}: {}", timestamp, e))?;
        let camera = camera
            .trim()
            .parse::<u32>()
            .map(CameraId)
            .map_err(|_| format!("bad camera {:?}", camera))?;
        let transition = Transition::parse(event_type.trim())
            .ok_or_else(|| format!("unknown event type {:?}", event_type))?;

        let (person, labels) = match transition {
            Transition::PersonDetected | Transition::PersonLeft => {
                (parse_person(details), Vec::new())
            }
            Transition::ObjectsWithPerson | Transition::ObjectsRemoved => {
                let (person, labels) = details
                    .split_once(PERSON_SEPARATOR)
                    .ok_or_else(|| format!("possession details without person: {:?}", details))?;
                (parse_person(person), split_labels(labels))
            }
            Transition::ObjectsAbandoned | Transition::AbandonedObjectsPicked => {
                (None, split_labels(details))
            }
        };

        Ok(Self {
            timestamp,
            camera,
            transition,
            person,
            labels,
        })
    }
}

fn parse_person(s: &str) -> Option<PersonId> {
    let s = s.trim();
    if s.is_empty() || s == NO_PERSON {
        None
    } else {
        Some(PersonId::from(s))
    }
}

fn split_labels(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Byte destination of the transition log
pub trait LogSink: Write + Send {
    /// Push written bytes to stable storage
    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogSink for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

/// Append handle on the transition log
///
/// Not internally synchronized: the timeline store holds it inside its own
/// lock so log order matches timeline order.
pub struct TransitionLog {
    path: Option<PathBuf>,
    mode: DurabilityMode,
    writer: Option<csv::Writer<Box<dyn LogSink>>>,
}

impl TransitionLog {
    /// Open (creating if needed) the log at `path` for appending.
    ///
    /// A new or empty file gets the header row first.
    pub fn open(path: impl AsRef<Path>, mode: DurabilityMode) -> Result<Self> {
        if !mode.requires_disk() {
            return Ok(Self::in_memory());
        }

        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let needs_header = fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::Writer::from_writer(Box::new(file) as Box<dyn LogSink>);
        if needs_header {
            writer.write_record(LOG_HEADER).map_err(csv_error)?;
            writer.flush()?;
            debug!(path = %path.display(), "created transition log");
        }

        Ok(Self {
            path: Some(path),
            mode,
            writer: Some(writer),
        })
    }

    /// Log that discards every row
    pub fn in_memory() -> Self {
        Self {
            path: None,
            mode: DurabilityMode::None,
            writer: None,
        }
    }

    /// Log that writes rows into `sink` with no backing path.
    ///
    /// No header is written and nothing written here is replayed.
    pub fn from_sink(sink: impl LogSink + 'static, mode: DurabilityMode) -> Self {
        Self {
            path: None,
            mode,
            writer: Some(csv::Writer::from_writer(Box::new(sink) as Box<dyn LogSink>)),
        }
    }

    /// Durability of appends
    pub fn mode(&self) -> DurabilityMode {
        self.mode
    }

    /// Backing path, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one row and push it to the OS (and disk, in Strict mode).
    pub fn append(&mut self, record: &LogRecord) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writer.write_record(record.to_fields()).map_err(csv_error)?;
        writer.flush()?;
        if self.mode.requires_fsync() {
            writer.get_mut().sync()?;
        }
        Ok(())
    }

    /// Truncate the log at `path` to just its header.
    pub fn reset(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
        writer.write_record(LOG_HEADER).map_err(csv_error)?;
        writer.flush()?;
        Ok(())
    }
}

pub(crate) fn csv_error(e: csv::Error) -> Error {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => Error::Io(io),
            other => Error::Serialization {
                message: format!("{:?}", other),
            },
        }
    } else {
        Error::Serialization {
            message: e.to_string(),
        }
    }
}
