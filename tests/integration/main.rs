//! Backtrack integration test suite
//!
//! Exercises the public `Backtrack` context end to end: identities, the
//! custody timeline, camera workers, the request workflow, recovery from
//! disk and concurrent access.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # One area only
//! cargo test --test integration recovery::
//! ```

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub use backtrack::*;
pub use tempfile::TempDir;

// Test modules
pub mod concurrency;
pub mod identity;
pub mod query;
pub mod recovery;
pub mod requests;
pub mod timeline;
pub mod tracking;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Backtrack with no disk I/O
pub fn ephemeral() -> Backtrack {
    Backtrack::ephemeral().expect("ephemeral backtrack")
}

/// Backtrack in a fresh temp directory
pub fn open_temp() -> (TempDir, Backtrack) {
    let dir = TempDir::new().expect("temp dir");
    let bt = Backtrack::open(dir.path()).expect("open backtrack");
    (dir, bt)
}

/// Fixed base time for hand-built events
pub fn base_time() -> Timestamp {
    chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
        .and_then(|d| d.and_hms_micro_opt(14, 0, 0, 0))
        .expect("valid date")
}

/// Event `offset_secs` after [`base_time`]
pub fn event(
    label: &str,
    kind: EventKind,
    person: Option<u64>,
    camera: u32,
    offset_secs: i64,
) -> TimelineEvent {
    TimelineEvent {
        label: label.to_string(),
        timestamp: base_time() + chrono::Duration::seconds(offset_secs),
        kind,
        person: person.map(PersonId::from_sequence),
        camera: CameraId(camera),
    }
}

/// Random embedding of `dim` floats in [-1, 1)
pub fn random_embedding(rng: &mut impl rand::Rng, dim: usize) -> Vec<f32> {
    (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// `base` shifted by `delta` in the first coordinate
pub fn nudge(base: &[f32], delta: f32) -> Vec<f32> {
    let mut v = base.to_vec();
    v[0] += delta;
    v
}

/// Wait up to 5s for `cond`
pub fn wait_for(cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
    true
}

// =============================================================================
// SCRIPTED CAMERA
// =============================================================================

/// One scripted frame: an optional face with its embedding, plus objects
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub face: Option<Vec<f32>>,
    pub objects: Vec<&'static str>,
}

impl Frame {
    pub fn person(embedding: &[f32], objects: &[&'static str]) -> Self {
        Self {
            face: Some(embedding.to_vec()),
            objects: objects.to_vec(),
        }
    }

    pub fn empty(objects: &[&'static str]) -> Self {
        Self {
            face: None,
            objects: objects.to_vec(),
        }
    }
}

/// Plays frames in order; once exhausted, every read fails
pub struct ScriptedSource {
    frames: VecDeque<Frame>,
    consumed: Arc<AtomicUsize>,
}

impl ScriptedSource {
    /// Source plus a counter of frames handed out
    pub fn new(frames: Vec<Frame>) -> (Self, Arc<AtomicUsize>) {
        let consumed = Arc::new(AtomicUsize::new(0));
        (
            Self {
                frames: frames.into(),
                consumed: Arc::clone(&consumed),
            },
            consumed,
        )
    }
}

impl FrameSource for ScriptedSource {
    type Frame = Frame;

    fn read_frame(&mut self) -> io::Result<Frame> {
        match self.frames.pop_front() {
            Some(frame) => {
                self.consumed.fetch_add(1, Ordering::AcqRel);
                Ok(frame)
            }
            None => {
                thread::sleep(Duration::from_millis(2));
                Err(io::Error::new(io::ErrorKind::UnexpectedEof, "script finished"))
            }
        }
    }
}

/// Face box at the origin; every object sits beside it
pub struct ScriptedModels;

const FACE_BOX: BoundingBox = BoundingBox {
    x1: 0.0,
    y1: 0.0,
    x2: 40.0,
    y2: 40.0,
};

impl Perception<Frame> for ScriptedModels {
    fn detect_faces(&mut self, frame: &Frame) -> std::result::Result<Vec<FaceBox>, PerceptionError> {
        Ok(frame.face.iter().map(|_| FaceBox::new(FACE_BOX)).collect())
    }

    fn embed_face(
        &mut self,
        frame: &Frame,
        _face: &FaceBox,
    ) -> std::result::Result<Vec<f32>, PerceptionError> {
        frame.face.clone().ok_or_else(|| "no face in frame".into())
    }

    fn detect_objects(
        &mut self,
        frame: &Frame,
    ) -> std::result::Result<Vec<ObjectDetection>, PerceptionError> {
        Ok(frame
            .objects
            .iter()
            .map(|label| ObjectDetection::new(*label, 0.9, BoundingBox::new(45.0, 10.0, 60.0, 30.0)))
            .collect())
    }
}

/// Run `frames` through a worker on `camera` and wait until all are read
/// and the worker has stopped.
pub fn play(bt: &Backtrack, camera: u32, frames: Vec<Frame>) {
    let total = frames.len();
    let (source, consumed) = ScriptedSource::new(frames);
    bt.start_camera(CameraId(camera), source, ScriptedModels)
        .expect("start camera");
    assert!(wait_for(|| consumed.load(Ordering::Acquire) >= total));
    // A tick in progress completes before the worker sees the flag
    bt.release_camera(CameraId(camera));
    assert!(wait_for(|| !bt.cameras().contains(&CameraId(camera))));
}
