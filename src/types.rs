//! Public types re-exported from the internal crates.

// Identifiers
pub use backtrack_core::{BlacklistId, CameraId, PersonId, RequestId};

// Perception outputs
pub use backtrack_core::{BoundingBox, FaceBox, ObjectDetection};

// Records
pub use backtrack_core::{
    BacktrackRequest, BlacklistRecord, EventKind, IdentityRecord, ObjectHistory, PersonActivity,
    RequestStatus, TimelineEvent, Timestamp,
};

// Trackable labels
pub use backtrack_core::{is_trackable, TRACKABLE_LABELS};

// Tracking engine seams
pub use backtrack_engine::{Alert, AlertError, AlertSink, FrameSource, Perception, PerceptionError};

// Durability
pub use backtrack_durability::{ReplayOptions, ReplayResult};
pub use backtrack_storage::DurabilityMode;

// Timestamp formats
pub use backtrack_core::{HISTORY_TIMESTAMP_FORMAT, LOG_TIMESTAMP_FORMAT};
