//! Alert Dispatcher
//!
//! Delivers blacklist hits to a single registered [`AlertSink`]. Delivery
//! is synchronous on the camera worker; a failing or panicking sink is
//! logged and never disturbs tracking.

use backtrack_core::{BlacklistId, CameraId, Timestamp};
use parking_lot::RwLock;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Error a sink may return
pub type AlertError = Box<dyn std::error::Error + Send + Sync>;

/// ISO-8601 local time with microseconds
const ALERT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A blacklisted person was seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Matched blacklist entry
    pub blacklist_id: BlacklistId,
    /// Camera that saw the person
    pub camera: CameraId,
    /// When, ISO-8601
    pub timestamp: String,
}

impl Alert {
    /// Build an alert stamped at `at`
    pub fn new(blacklist_id: BlacklistId, camera: CameraId, at: Timestamp) -> Self {
        Self {
            blacklist_id,
            camera,
            timestamp: at.format(ALERT_TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on camera {} at {}",
            self.blacklist_id, self.camera, self.timestamp
        )
    }
}

/// Receiver of blacklist alerts
pub trait AlertSink: Send + Sync {
    /// Handle one alert
    fn on_alert(&self, alert: &Alert) -> Result<(), AlertError>;
}

impl<F> AlertSink for F
where
    F: Fn(&Alert) -> Result<(), AlertError> + Send + Sync,
{
    fn on_alert(&self, alert: &Alert) -> Result<(), AlertError> {
        self(alert)
    }
}

/// What happened to one alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Sink accepted it
    Delivered,
    /// Sink returned an error or panicked
    Failed,
    /// No sink registered; the alert was only logged
    Unhandled,
}

/// Routes alerts to the registered sink
#[derive(Default)]
pub struct AlertDispatcher {
    sink: RwLock<Option<Arc<dyn AlertSink>>>,
    dispatched: AtomicU64,
    failed: AtomicU64,
}

impl AlertDispatcher {
    /// Dispatcher without a sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sink`, replacing any previous one
    pub fn set_sink(&self, sink: impl AlertSink + 'static) {
        *self.sink.write() = Some(Arc::new(sink));
    }

    /// Remove the sink
    pub fn clear_sink(&self) {
        *self.sink.write() = None;
    }

    /// Whether a sink is registered
    pub fn has_sink(&self) -> bool {
        self.sink.read().is_some()
    }

    /// Deliver one alert. Never fails.
    pub fn dispatch(&self, alert: &Alert) -> Delivery {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        // Clone out so a slow sink does not hold the lock
        let sink = self.sink.read().clone();
        let Some(sink) = sink else {
            warn!(
                blacklist_id = %alert.blacklist_id,
                camera = %alert.camera,
                timestamp = %alert.timestamp,
                "blacklisted person detected (no alert sink registered)"
            );
            return Delivery::Unhandled;
        };

        match catch_unwind(AssertUnwindSafe(|| sink.on_alert(alert))) {
            Ok(Ok(())) => {
                debug!(alert = %alert, "alert delivered");
                Delivery::Delivered
            }
            Ok(Err(e)) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(alert = %alert, error = %e, "alert sink failed");
                Delivery::Failed
            }
            Err(_) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                error!(alert = %alert, "alert sink panicked");
                Delivery::Failed
            }
        }
    }

    /// Alerts dispatched so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Alerts whose sink failed
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}
