//! Possession geometry
//!
//! An object is with a person when either:
//! - the face centre and object centre are closer than the proximity
//!   threshold, or
//! - the object centre lies inside the face box grown by the face's own
//!   width and height on every side.

use backtrack_core::{BoundingBox, FaceBox, ObjectDetection};
use std::collections::BTreeSet;

/// Default centre-distance threshold in pixels
pub const DEFAULT_PROXIMITY_THRESHOLD: f32 = 200.0;

/// Whether `object` is close enough to `face` to count as held
pub fn is_near(face: &FaceBox, object: &BoundingBox, proximity: f32) -> bool {
    let (fx, fy) = face.bbox.center();
    let (ox, oy) = object.center();
    let distance = ((fx - ox).powi(2) + (fy - oy).powi(2)).sqrt();

    let region = face
        .bbox
        .expanded(face.bbox.width(), face.bbox.height());
    distance < proximity || region.contains((ox, oy))
}

/// Split detected labels into held and abandoned sets.
///
/// A label is held when any detection of it is near `face`; every other
/// detected label is abandoned. Without a face nothing is held.
pub fn partition(
    face: Option<&FaceBox>,
    detections: &[ObjectDetection],
    proximity: f32,
) -> (BTreeSet<String>, BTreeSet<String>) {
    let held: BTreeSet<String> = match face {
        Some(face) => detections
            .iter()
            .filter(|d| is_near(face, &d.bbox, proximity))
            .map(|d| d.label.clone())
            .collect(),
        None => BTreeSet::new(),
    };
    let abandoned = detections
        .iter()
        .filter(|d| !held.contains(&d.label))
        .map(|d| d.label.clone())
        .collect();
    (held, abandoned)
}
