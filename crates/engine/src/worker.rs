//! Camera worker
//!
//! One worker per camera runs the tick loop on its own thread:
//!
//! ```text
//! read frame ─▶ detect faces/objects ─▶ resolve identities ─▶ blacklist alerts
//!      ─▶ classify possession ─▶ diff against last tick ─▶ record transitions
//! ```
//!
//! A tick blocks only on the frame source, the embedding store lock and the
//! timeline lock. The stop flag is checked once per tick; a tick in
//! progress always completes.

use crate::alert::{Alert, AlertDispatcher};
use crate::camera::{CameraState, Observation};
use crate::perception::{FrameSource, Perception};
use backtrack_core::{is_trackable, now, CameraId, FaceBox, PersonId, Transition};
use backtrack_primitives::{EmbeddingStore, Timeline};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared stores a worker writes to
#[derive(Clone)]
pub struct WorkerContext {
    /// Identity resolution
    pub embeddings: Arc<EmbeddingStore>,
    /// Custody timeline
    pub timeline: Arc<Timeline>,
    /// Blacklist alerts
    pub alerts: Arc<AlertDispatcher>,
    /// Possession distance threshold in pixels
    pub proximity_threshold: f32,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The frame could not be read or analysed; state unchanged
    Skipped,
    /// The frame was processed
    Processed {
        /// Transition groups recorded
        transitions: usize,
        /// Blacklist alerts dispatched
        alerts: usize,
    },
}

/// Tick loop for one camera
pub struct CameraWorker<S, P> {
    source: S,
    perception: P,
    context: WorkerContext,
    state: CameraState,
    stop: Arc<AtomicBool>,
}

impl<S, P> CameraWorker<S, P>
where
    S: FrameSource,
    P: Perception<S::Frame>,
{
    /// Worker for `camera`, stopped by setting `stop`
    pub fn new(
        camera: CameraId,
        source: S,
        perception: P,
        context: WorkerContext,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            perception,
            context,
            state: CameraState::new(camera),
            stop,
        }
    }

    /// Camera this worker reads
    pub fn camera(&self) -> CameraId {
        self.state.camera
    }

    /// State after the last processed tick
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Process one frame.
    pub fn tick(&mut self) -> TickOutcome {
        let camera = self.state.camera;
        let frame = match self.source.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(camera = %camera, error = %e, "failed to read frame");
                return TickOutcome::Skipped;
            }
        };

        let faces = match self.perception.detect_faces(&frame) {
            Ok(faces) => faces,
            Err(e) => {
                warn!(camera = %camera, error = %e, "face detection failed");
                return TickOutcome::Skipped;
            }
        };
        let mut detections = match self.perception.detect_objects(&frame) {
            Ok(detections) => detections,
            Err(e) => {
                warn!(camera = %camera, error = %e, "object detection failed");
                return TickOutcome::Skipped;
            }
        };
        detections.retain(|d| is_trackable(&d.label));

        let mut current: Option<(PersonId, FaceBox)> = None;
        let mut alerts = 0;
        for face in &faces {
            let embedding = match self.perception.embed_face(&frame, face) {
                Ok(embedding) => embedding,
                Err(e) => {
                    warn!(camera = %camera, error = %e, "face embedding failed");
                    continue;
                }
            };
            let person = match self.context.embeddings.resolve_or_register(&embedding) {
                Ok(person) => person,
                Err(e) => {
                    warn!(
                        camera = %camera,
                        code = e.error_code(),
                        error = %e,
                        "identity resolution failed"
                    );
                    continue;
                }
            };

            match self.context.embeddings.match_blacklist(&embedding) {
                Ok(hit) => {
                    if let Some(record) = hit.record {
                        let alert = Alert::new(record.id, camera, now());
                        self.context.alerts.dispatch(&alert);
                        alerts += 1;
                    }
                }
                Err(e) => warn!(
                    camera = %camera,
                    code = e.error_code(),
                    error = %e,
                    "blacklist lookup failed"
                ),
            }

            if current.is_none() {
                current = Some((person, *face));
            }
        }

        let (person, face) = match current {
            Some((person, face)) => (Some(person), Some(face)),
            None => (None, None),
        };
        let observation = Observation::classify(
            person,
            face.as_ref(),
            &detections,
            self.context.proximity_threshold,
        );
        let (next, groups) = self.state.advance(observation);

        for group in &groups {
            self.context.timeline.record(camera, group);
            if group.transition == Transition::ObjectsAbandoned {
                self.warn_abandoned(group.labels.iter());
            }
        }
        if !groups.is_empty() {
            debug!(camera = %camera, transitions = groups.len(), "tick recorded transitions");
        }
        self.state = next;

        TickOutcome::Processed {
            transitions: groups.len(),
            alerts,
        }
    }

    /// Tick until the stop flag is set, then release the source.
    pub fn run(mut self) {
        let camera = self.state.camera;
        info!(camera = %camera, "camera worker started");
        while !self.stop.load(Ordering::Acquire) {
            self.tick();
        }
        self.source.release();
        info!(camera = %camera, "camera worker stopped");
    }

    fn warn_abandoned<'a>(&self, labels: impl Iterator<Item = &'a String>) {
        for label in labels {
            let Some(history) = self.context.timeline.history(label) else {
                continue;
            };
            if let Some(last_person) = history.last_person {
                warn!(
                    camera = %self.state.camera,
                    object = %label,
                    last_person = %last_person,
                    "object abandoned"
                );
            }
        }
    }
}
