//! Timeline Store: per-object custody history
//!
//! ## Design
//!
//! One `Mutex` guards both the in-memory event map and the transition log
//! handle. Camera workers call [`Timeline::record`], which takes the
//! timestamp, stores the events and writes the log row inside that one
//! critical section, so per-object event order and log row order agree.
//!
//! ## Ordering
//!
//! Events for one object are kept in non-decreasing timestamp order.
//! `record` never hands out a timestamp older than anything already stored;
//! `append` rejects events that would go backwards.
//!
//! ## Durability
//!
//! The log is replayed into the map on open. A failed log write is logged
//! and the tick goes on; the event still reaches the in-memory timeline.

use backtrack_core::{
    is_trackable, now, CameraId, Error, ObjectHistory, PersonActivity, PersonId, Result,
    TimelineEvent, Timestamp, TransitionGroup,
};
use backtrack_durability::{
    events_from_record, replay, LogRecord, ReplayOptions, ReplayResult, TransitionLog,
};
use backtrack_storage::DurabilityMode;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

struct Inner {
    events: FxHashMap<String, Vec<TimelineEvent>>,
    log: TransitionLog,
    /// Newest timestamp stored so far
    latest: Option<Timestamp>,
}

impl Inner {
    fn insert(&mut self, event: TimelineEvent) {
        if self.latest.map_or(true, |latest| event.timestamp > latest) {
            self.latest = Some(event.timestamp);
        }
        self.events.entry(event.label.clone()).or_default().push(event);
    }

    fn write_log(&mut self, record: &LogRecord) {
        if let Err(e) = self.log.append(record) {
            warn!(
                error = %e,
                transition = %record.transition,
                camera = %record.camera,
                "transition log append failed"
            );
        }
    }
}

/// Shared, append-only object timeline
pub struct Timeline {
    mode: DurabilityMode,
    inner: Mutex<Inner>,
    replayed: ReplayResult,
}

impl Timeline {
    /// Open the timeline backed by the log at `path`, replaying it first.
    ///
    /// # Errors
    /// - `Corruption` if the log has more malformed rows than `options` allow
    /// - `Io` if the log cannot be read or opened for append
    pub fn open(
        path: impl AsRef<Path>,
        mode: DurabilityMode,
        options: &ReplayOptions,
    ) -> Result<Self> {
        if !mode.requires_disk() {
            return Ok(Self::in_memory());
        }

        let path = path.as_ref();
        let (events, replayed) = replay(path, options)?;
        let log = TransitionLog::open(path, mode)?;

        let mut inner = Inner {
            events: FxHashMap::default(),
            log,
            latest: None,
        };
        for event in events {
            inner.insert(event);
        }
        info!(
            path = %path.display(),
            objects = inner.events.len(),
            events = replayed.events_replayed,
            "timeline opened"
        );

        Ok(Self {
            mode,
            inner: Mutex::new(inner),
            replayed,
        })
    }

    /// Timeline without a log
    pub fn in_memory() -> Self {
        Self {
            mode: DurabilityMode::None,
            inner: Mutex::new(Inner {
                events: FxHashMap::default(),
                log: TransitionLog::in_memory(),
                latest: None,
            }),
            replayed: ReplayResult::default(),
        }
    }

    /// Empty timeline writing to an already-open `log`; nothing is replayed.
    pub fn with_log(log: TransitionLog) -> Self {
        Self {
            mode: log.mode(),
            inner: Mutex::new(Inner {
                events: FxHashMap::default(),
                log,
                latest: None,
            }),
            replayed: ReplayResult::default(),
        }
    }

    /// Statistics from the replay done at open
    pub fn replayed(&self) -> &ReplayResult {
        &self.replayed
    }

    /// Backing log path, `None` when in memory
    pub fn log_path(&self) -> Option<PathBuf> {
        self.inner.lock().log.path().map(Path::to_path_buf)
    }

    /// Record one transition group seen by `camera`.
    ///
    /// Object groups become one event per label; person groups are only
    /// logged. Returns the timestamp assigned to the group.
    pub fn record(&self, camera: CameraId, group: &TransitionGroup) -> Timestamp {
        let mut inner = self.inner.lock();
        let timestamp = match inner.latest {
            Some(latest) => now().max(latest),
            None => now(),
        };

        let record = LogRecord::from_group(timestamp, camera, group);
        for event in events_from_record(&record) {
            inner.insert(event);
        }
        inner.write_log(&record);
        debug!(
            camera = %camera,
            transition = %group.transition,
            objects = group.labels.len(),
            "recorded transition"
        );
        timestamp
    }

    /// Append a single event and log it as a one-label row.
    ///
    /// # Errors
    /// - `UnknownLabel` if the label is not trackable
    /// - `InvalidInput` if the event is older than the object's last event,
    ///   or its person does not fit its kind
    pub fn append(&self, event: TimelineEvent) -> Result<()> {
        if !is_trackable(&event.label) {
            return Err(Error::UnknownLabel { label: event.label });
        }
        if event.kind.carries_person() != event.person.is_some() {
            return Err(Error::invalid_input(format!(
                "{} events {} a person",
                event.kind,
                if event.kind.carries_person() { "require" } else { "never carry" }
            )));
        }

        let mut inner = self.inner.lock();
        if let Some(last) = inner.events.get(&event.label).and_then(|v| v.last()) {
            if event.timestamp < last.timestamp {
                return Err(Error::invalid_input(format!(
                    "event for {} at {} is older than its last event at {}",
                    event.label, event.timestamp, last.timestamp
                )));
            }
        }

        let record = LogRecord {
            timestamp: event.timestamp,
            camera: event.camera,
            transition: event.kind.transition(),
            person: event.person.clone(),
            labels: vec![event.label.clone()],
        };
        inner.write_log(&record);
        inner.insert(event);
        Ok(())
    }

    /// All events for `label`, oldest first
    pub fn events(&self, label: &str) -> Vec<TimelineEvent> {
        self.inner
            .lock()
            .events
            .get(label)
            .cloned()
            .unwrap_or_default()
    }

    /// Custody history of `label`, `None` if nothing was ever recorded
    pub fn history(&self, label: &str) -> Option<ObjectHistory> {
        let events = self.events(label);
        build_history(label, &events)
    }

    /// Labels with at least one event, sorted
    pub fn tracked_objects(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.inner.lock().events.keys().cloned().collect();
        labels.sort();
        labels
    }

    /// Events attributed to `person` across all objects, `None` if there
    /// are none.
    pub fn person_activity(&self, person: &PersonId) -> Option<PersonActivity> {
        let events = {
            let inner = self.inner.lock();
            attributed(&inner.events, |p| p == person)
        };
        PersonActivity::from_events(person.clone(), &events)
    }

    /// Activity of every person the timeline names, ordered by person id
    pub fn people(&self) -> Vec<PersonActivity> {
        let events = {
            let inner = self.inner.lock();
            attributed(&inner.events, |_| true)
        };
        let mut by_person: BTreeMap<PersonId, Vec<TimelineEvent>> = BTreeMap::new();
        for event in events {
            if let Some(person) = event.person.clone() {
                by_person.entry(person).or_default().push(event);
            }
        }
        by_person
            .into_iter()
            .filter_map(|(person, events)| PersonActivity::from_events(person, &events))
            .collect()
    }

    /// Total stored events
    pub fn event_count(&self) -> usize {
        self.inner.lock().events.values().map(Vec::len).sum()
    }

    /// Drop every event and truncate the log to its header.
    pub fn reset(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        if let Some(path) = inner.log.path().map(Path::to_path_buf) {
            TransitionLog::reset(&path)?;
            inner.log = TransitionLog::open(&path, self.mode)?;
        }
        inner.events.clear();
        inner.latest = None;
        info!("timeline reset");
        Ok(())
    }
}

/// Events whose person passes `keep`, ordered by time then label
fn attributed(
    events: &FxHashMap<String, Vec<TimelineEvent>>,
    keep: impl Fn(&PersonId) -> bool,
) -> Vec<TimelineEvent> {
    let mut matched: Vec<TimelineEvent> = events
        .values()
        .flatten()
        .filter(|e| e.person.as_ref().map_or(false, &keep))
        .cloned()
        .collect();
    matched.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.label.cmp(&b.label)));
    matched
}

/// Derive an [`ObjectHistory`] from an object's events (oldest first).
///
/// `last_person` is the person of the most recent event that has one.
pub fn build_history(label: &str, events: &[TimelineEvent]) -> Option<ObjectHistory> {
    let last = events.last()?;
    Some(ObjectHistory {
        object: label.to_string(),
        last_person: events.iter().rev().find_map(|e| e.person.clone()),
        current_status: last.kind,
        current_camera: last.camera,
        timeline: events.iter().map(TimelineEvent::format_line).collect(),
    })
}
