//! Per-camera tracking state machine
//!
//! The state is the last tick's view of one camera: who was in front of it,
//! which labels they held and which labels lay abandoned. Each tick builds
//! an [`Observation`], and [`CameraState::advance`] diffs it against the
//! previous state to produce the tick's transition groups.
//!
//! Group order within a tick:
//!
//! ```text
//! person_detected | person_left
//! objects_with_person      (new held labels, current person)
//! objects_removed          (labels no longer held, previous person)
//! objects_abandoned        (new abandoned labels)
//! abandoned_objects_picked (labels no longer abandoned)
//! ```

use crate::possession::partition;
use backtrack_core::{CameraId, FaceBox, ObjectDetection, PersonId, Transition, TransitionGroup};
use std::collections::BTreeSet;

/// What one tick saw
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observation {
    /// First resolved person, if any
    pub person: Option<PersonId>,
    /// Labels near that person
    pub held: BTreeSet<String>,
    /// Every other detected label
    pub abandoned: BTreeSet<String>,
}

impl Observation {
    /// Classify detections around the person's face.
    ///
    /// `face` is ignored when `person` is `None`.
    pub fn classify(
        person: Option<PersonId>,
        face: Option<&FaceBox>,
        detections: &[ObjectDetection],
        proximity: f32,
    ) -> Self {
        let face = if person.is_some() { face } else { None };
        let (held, abandoned) = partition(face, detections, proximity);
        Self {
            person,
            held,
            abandoned,
        }
    }
}

/// Last known state of one camera
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraState {
    /// Camera this state belongs to
    pub camera: CameraId,
    /// Current person
    pub person: Option<PersonId>,
    /// Labels held by the current person
    pub held: BTreeSet<String>,
    /// Labels detected with nobody holding them
    pub abandoned: BTreeSet<String>,
}

impl CameraState {
    /// Empty state: nobody present, nothing detected
    pub fn new(camera: CameraId) -> Self {
        Self {
            camera,
            person: None,
            held: BTreeSet::new(),
            abandoned: BTreeSet::new(),
        }
    }

    /// Diff `observation` against this state.
    ///
    /// Returns the replacement state and the transition groups, in log
    /// order. Empty groups are never produced.
    pub fn advance(&self, observation: Observation) -> (CameraState, Vec<TransitionGroup>) {
        let mut groups = Vec::new();

        if observation.person != self.person {
            match (&self.person, &observation.person) {
                (_, Some(current)) => groups.push(TransitionGroup::person(
                    Transition::PersonDetected,
                    current.clone(),
                )),
                (Some(previous), None) => groups.push(TransitionGroup::person(
                    Transition::PersonLeft,
                    previous.clone(),
                )),
                (None, None) => {}
            }
        }

        let picked: BTreeSet<String> = observation.held.difference(&self.held).cloned().collect();
        if !picked.is_empty() {
            groups.push(TransitionGroup::objects(
                Transition::ObjectsWithPerson,
                observation.person.clone(),
                picked,
            ));
        }

        let removed: BTreeSet<String> = self.held.difference(&observation.held).cloned().collect();
        if !removed.is_empty() {
            groups.push(TransitionGroup::objects(
                Transition::ObjectsRemoved,
                self.person.clone(),
                removed,
            ));
        }

        let abandoned: BTreeSet<String> = observation
            .abandoned
            .difference(&self.abandoned)
            .cloned()
            .collect();
        if !abandoned.is_empty() {
            groups.push(TransitionGroup::objects(
                Transition::ObjectsAbandoned,
                None,
                abandoned,
            ));
        }

        let recovered: BTreeSet<String> = self
            .abandoned
            .difference(&observation.abandoned)
            .cloned()
            .collect();
        if !recovered.is_empty() {
            groups.push(TransitionGroup::objects(
                Transition::AbandonedObjectsPicked,
                None,
                recovered,
            ));
        }

        let next = CameraState {
            camera: self.camera,
            person: observation.person,
            held: observation.held,
            abandoned: observation.abandoned,
        };
        (next, groups)
    }
}
