//! Detection boxes in pixel coordinates
//!
//! Face and object detectors report boxes in different corner orders; both
//! are normalized to [`BoundingBox`] (`x1, y1` top-left, `x2, y2`
//! bottom-right) before any geometry is computed.

use serde::{Deserialize, Serialize};

/// Axis-aligned box, `(x1, y1)` top-left and `(x2, y2)` bottom-right
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
}

impl BoundingBox {
    /// Create a box from its corners
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build from a face detector's `(top, right, bottom, left)` tuple
    pub fn from_trbl(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            x1: left,
            y1: top,
            x2: right,
            y2: bottom,
        }
    }

    /// Box width
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Box height
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Centre point
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Grow by `dx` horizontally and `dy` vertically on every side
    pub fn expanded(&self, dx: f32, dy: f32) -> Self {
        Self {
            x1: self.x1 - dx,
            y1: self.y1 - dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// Whether a point lies inside the box, edges inclusive
    pub fn contains(&self, (x, y): (f32, f32)) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }
}

/// A detected face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    /// Face location
    pub bbox: BoundingBox,
}

impl FaceBox {
    /// Wrap a bounding box
    pub fn new(bbox: BoundingBox) -> Self {
        Self { bbox }
    }
}

/// A detected object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDetection {
    /// Class label (e.g. `backpack`)
    pub label: String,
    /// Detector confidence in `[0, 1]`
    pub confidence: f32,
    /// Object location
    pub bbox: BoundingBox,
}

impl ObjectDetection {
    /// Create a detection
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }
}
