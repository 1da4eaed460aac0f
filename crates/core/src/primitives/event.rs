//! Timeline event types
//!
//! A camera tick produces [`TransitionGroup`]s; each possession or
//! abandonment group expands into one [`TimelineEvent`] per object label.
//! Person appear/leave groups are logged but never enter the timeline.

use crate::types::{CameraId, PersonId, Timestamp, HISTORY_TIMESTAMP_FORMAT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// What happened to an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Object came into a person's possession
    PickedUp,
    /// Object left a person's possession
    RemovedFromPerson,
    /// Object is visible with nobody holding it
    Abandoned,
    /// Previously abandoned object is no longer lying around
    PickedFromAbandoned,
}

impl EventKind {
    /// Canonical name used in history lines
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PickedUp => "picked_up",
            EventKind::RemovedFromPerson => "removed_from_person",
            EventKind::Abandoned => "abandoned",
            EventKind::PickedFromAbandoned => "picked_from_abandoned",
        }
    }

    /// Whether events of this kind carry the holder's id
    pub fn carries_person(&self) -> bool {
        matches!(self, EventKind::PickedUp | EventKind::RemovedFromPerson)
    }

    /// Log row kind that produces this event
    pub fn transition(&self) -> Transition {
        match self {
            EventKind::PickedUp => Transition::ObjectsWithPerson,
            EventKind::RemovedFromPerson => Transition::ObjectsRemoved,
            EventKind::Abandoned => Transition::ObjectsAbandoned,
            EventKind::PickedFromAbandoned => Transition::AbandonedObjectsPicked,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transition log row kind
///
/// Names are the `event_type` column of the transition log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// A (different) person became the camera's current person
    PersonDetected,
    /// The camera lost its current person
    PersonLeft,
    /// Objects entered the current person's possession
    ObjectsWithPerson,
    /// Objects left the previous holder's possession
    ObjectsRemoved,
    /// Objects became abandoned
    ObjectsAbandoned,
    /// Objects left the abandoned set
    AbandonedObjectsPicked,
}

impl Transition {
    /// All row kinds
    pub const ALL: [Transition; 6] = [
        Transition::PersonDetected,
        Transition::PersonLeft,
        Transition::ObjectsWithPerson,
        Transition::ObjectsRemoved,
        Transition::ObjectsAbandoned,
        Transition::AbandonedObjectsPicked,
    ];

    /// Log column value
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::PersonDetected => "person_detected",
            Transition::PersonLeft => "person_left",
            Transition::ObjectsWithPerson => "objects_with_person",
            Transition::ObjectsRemoved => "objects_removed",
            Transition::ObjectsAbandoned => "objects_abandoned",
            Transition::AbandonedObjectsPicked => "abandoned_objects_picked",
        }
    }

    /// Parse a log column value
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// Timeline event kind produced for each label, `None` for person rows
    pub fn event_kind(&self) -> Option<EventKind> {
        match self {
            Transition::PersonDetected | Transition::PersonLeft => None,
            Transition::ObjectsWithPerson => Some(EventKind::PickedUp),
            Transition::ObjectsRemoved => Some(EventKind::RemovedFromPerson),
            Transition::ObjectsAbandoned => Some(EventKind::Abandoned),
            Transition::AbandonedObjectsPicked => Some(EventKind::PickedFromAbandoned),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One batch of same-kind changes detected on a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionGroup {
    /// Row kind
    pub transition: Transition,
    /// Person the group is attributed to
    ///
    /// Present for person rows and possession rows, absent for abandonment.
    pub person: Option<PersonId>,
    /// Object labels, empty for person rows
    pub labels: BTreeSet<String>,
}

impl TransitionGroup {
    /// Person appeared or left
    pub fn person(transition: Transition, person: PersonId) -> Self {
        Self {
            transition,
            person: Some(person),
            labels: BTreeSet::new(),
        }
    }

    /// Object group
    pub fn objects(
        transition: Transition,
        person: Option<PersonId>,
        labels: BTreeSet<String>,
    ) -> Self {
        Self {
            transition,
            person,
            labels,
        }
    }
}

/// One entry in an object's timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Object label
    pub label: String,
    /// When the change was recorded
    pub timestamp: Timestamp,
    /// What happened
    pub kind: EventKind,
    /// Holder, for possession events
    pub person: Option<PersonId>,
    /// Camera that observed it
    pub camera: CameraId,
}

impl TimelineEvent {
    /// Human-readable line: `<ts>: <event> [by <person>] on camera <camera>`
    pub fn format_line(&self) -> String {
        let ts = self.timestamp.format(HISTORY_TIMESTAMP_FORMAT);
        match &self.person {
            Some(person) => format!(
                "{}: {} by {} on camera {}",
                ts, self.kind, person, self.camera
            ),
            None => format!("{}: {} on camera {}", ts, self.kind, self.camera),
        }
    }

    /// Line naming the object instead of the person:
    /// `<ts>: <event> <label> on camera <camera>`
    pub fn format_object_line(&self) -> String {
        format!(
            "{}: {} {} on camera {}",
            self.timestamp.format(HISTORY_TIMESTAMP_FORMAT),
            self.kind,
            self.label,
            self.camera
        )
    }
}

/// Reconstructed custody history of one object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectHistory {
    /// Object label
    pub object: String,
    /// Most recent holder, skipping events without a person
    pub last_person: Option<PersonId>,
    /// Kind of the latest event
    pub current_status: EventKind,
    /// Camera of the latest event
    pub current_camera: CameraId,
    /// Formatted events, oldest first
    pub timeline: Vec<String>,
}

/// Everything the timeline attributes to one person, across objects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonActivity {
    /// Person the events are attributed to
    pub person: PersonId,
    /// Objects the person held at some point, sorted
    pub objects: Vec<String>,
    /// Cameras that saw the person with an object, ascending
    pub cameras: Vec<CameraId>,
    /// Time of the latest attributed event
    pub last_seen: Timestamp,
    /// Camera of the latest attributed event
    pub last_camera: CameraId,
    /// Formatted events, oldest first
    pub timeline: Vec<String>,
}

impl PersonActivity {
    /// Build from `person`'s events, oldest first. `None` when empty.
    pub fn from_events(person: PersonId, events: &[TimelineEvent]) -> Option<Self> {
        let last = events.last()?;
        let objects: BTreeSet<&str> = events.iter().map(|e| e.label.as_str()).collect();
        let cameras: BTreeSet<CameraId> = events.iter().map(|e| e.camera).collect();
        Some(Self {
            person,
            objects: objects.into_iter().map(str::to_string).collect(),
            cameras: cameras.into_iter().collect(),
            last_seen: last.timestamp,
            last_camera: last.camera,
            timeline: events.iter().map(TimelineEvent::format_object_line).collect(),
        })
    }
}
