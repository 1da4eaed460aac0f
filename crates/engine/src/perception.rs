//! Perception seams
//!
//! Frame capture, face detection, face embedding and object detection are
//! external collaborators. The tracker only sees these traits, so any
//! camera backend or model runtime can drive it, and tests drive it with
//! scripted fakes.

use backtrack_core::{FaceBox, ObjectDetection};
use std::io;

/// Error returned by perception models
pub type PerceptionError = Box<dyn std::error::Error + Send + Sync>;

/// A camera or video stream
pub trait FrameSource: Send {
    /// Decoded frame handed to [`Perception`]
    type Frame;

    /// Read the next frame.
    ///
    /// Errors are treated as transient: the worker skips the tick and
    /// reads again.
    fn read_frame(&mut self) -> io::Result<Self::Frame>;

    /// Release the underlying device. Called once when the worker stops.
    fn release(&mut self) {}
}

/// Face and object models for one frame type
pub trait Perception<F>: Send {
    /// Face boxes in detector order
    fn detect_faces(&mut self, frame: &F) -> Result<Vec<FaceBox>, PerceptionError>;

    /// Embedding of one detected face
    fn embed_face(&mut self, frame: &F, face: &FaceBox) -> Result<Vec<f32>, PerceptionError>;

    /// Object detections (any labels; the worker filters to trackable ones)
    fn detect_objects(&mut self, frame: &F) -> Result<Vec<ObjectDetection>, PerceptionError>;
}
