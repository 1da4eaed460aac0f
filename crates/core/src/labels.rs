//! Trackable object allow-list
//!
//! Detectors report many classes; only these are tracked for custody.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Labels the tracker follows, grouped the way operators think about them
pub const TRACKABLE_LABELS: &[&str] = &[
    // Bags and containers
    "backpack",
    "handbag",
    "suitcase",
    "bag",
    "briefcase",
    "box",
    // Electronics
    "cell phone",
    "laptop",
    "keyboard",
    "mouse",
    "remote",
    "camera",
    "tv",
    "monitor",
    // Personal items
    "bottle",
    "cup",
    "umbrella",
    "book",
    "wallet",
    // Valuables
    "clock",
    "vase",
    "scissors",
    "teddy bear",
    "bicycle",
    "skateboard",
];

static TRACKABLE: Lazy<HashSet<&'static str>> =
    Lazy::new(|| TRACKABLE_LABELS.iter().copied().collect());

/// Whether `label` is on the allow-list
pub fn is_trackable(label: &str) -> bool {
    TRACKABLE.contains(label)
}
