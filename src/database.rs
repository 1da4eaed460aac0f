//! Main entry point for Backtrack.
//!
//! This module provides the `Backtrack` struct, the context object that owns
//! every store and the camera tracker for the life of the process.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::primitives::{Blacklist, Objects, Requests};
use backtrack_core::{CameraId, IdentityRecord, PersonId};
use backtrack_durability::{ReplayOptions, ReplayResult};
use backtrack_engine::{AlertDispatcher, AlertSink, FrameSource, Perception, Tracker};
use backtrack_primitives::{BacktrackRequests, EmbeddingStore, Timeline};
use backtrack_storage::DurabilityMode;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Registered identities
pub const EMBEDDINGS_FILE: &str = "embeddings.json";
/// Blacklist entries
pub const BLACKLIST_FILE: &str = "blacklist.json";
/// Transition log
pub const TRACK_LOG_FILE: &str = "track_log.csv";
/// Backtrack requests
pub const REQUESTS_FILE: &str = "backtrack_requests.json";

/// The Backtrack context.
///
/// Create one per process with [`Backtrack::open`] or [`Backtrack::builder`]
/// and share it by reference. Camera workers started through it write to
/// its stores; [`Backtrack::shutdown`] (or dropping it) stops them.
///
/// # Example
///
/// ```ignore
/// use backtrack::prelude::*;
///
/// let bt = Backtrack::open("./data")?;
/// bt.start_camera(CameraId(0), webcam, models)?;
///
/// if let Some(history) = bt.objects.find_history("laptop")? {
///     println!("last seen with {:?}", history.last_person);
/// }
///
/// bt.shutdown();
/// ```
pub struct Backtrack {
    config: Config,
    embeddings: Arc<EmbeddingStore>,
    timeline: Arc<Timeline>,
    alerts: Arc<AlertDispatcher>,
    tracker: Tracker,

    /// Blacklist management
    pub blacklist: Blacklist,

    /// Object history queries
    pub objects: Objects,

    /// Backtrack request workflow
    pub requests: Requests,
}

impl Backtrack {
    /// Open the stores in `path` with default settings (buffered durability).
    ///
    /// The directory is created if needed. Existing files are loaded and the
    /// transition log is replayed.
    ///
    /// # Errors
    /// - `Corruption` if any store or the log holds malformed data
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// Backtrack with no disk I/O. Everything is lost when dropped.
    pub fn ephemeral() -> Result<Self> {
        Self::builder().no_durability().open()
    }

    /// Create a builder.
    pub fn builder() -> BacktrackBuilder {
        BacktrackBuilder::new()
    }

    /// Open with a loaded configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let mode = config.storage.durability;
        let dir = config.storage.data_dir.clone();
        if mode.requires_disk() {
            fs::create_dir_all(&dir)?;
        }

        let embeddings = Arc::new(EmbeddingStore::open(
            dir.join(EMBEDDINGS_FILE),
            dir.join(BLACKLIST_FILE),
            mode,
            config.identity.threshold,
        )?);
        let timeline = Arc::new(Timeline::open(
            dir.join(TRACK_LOG_FILE),
            mode,
            &config.storage.replay_options(),
        )?);
        let requests = Arc::new(BacktrackRequests::open(
            dir.join(REQUESTS_FILE),
            mode,
            Arc::clone(&timeline),
        )?);
        let alerts = Arc::new(AlertDispatcher::new());
        let tracker = Tracker::new(
            Arc::clone(&embeddings),
            Arc::clone(&timeline),
            Arc::clone(&alerts),
            config.tracking.proximity_threshold,
        );

        info!(
            data_dir = %dir.display(),
            durability = mode.description(),
            identities = embeddings.len(),
            events = timeline.event_count(),
            "backtrack opened"
        );

        Ok(Self {
            blacklist: Blacklist::new(Arc::clone(&embeddings)),
            objects: Objects::new(
                Arc::clone(&timeline),
                Arc::clone(&embeddings),
                config.query.clone(),
            ),
            requests: Requests::new(requests),
            config,
            embeddings,
            timeline,
            alerts,
            tracker,
        })
    }

    // ========================================================================
    // Identities
    // ========================================================================

    /// Match `embedding` against registered identities, registering a new
    /// `Person_NNN` on a miss.
    pub fn resolve_identity(&self, embedding: &[f32]) -> Result<PersonId> {
        Ok(self.embeddings.resolve_or_register(embedding)?)
    }

    /// Match `embedding` against registered identities without registering.
    pub fn match_identity(&self, embedding: &[f32]) -> Result<Option<PersonId>> {
        Ok(self.embeddings.match_registered(embedding)?)
    }

    /// Registered identities in registration order
    pub fn identities(&self) -> Vec<IdentityRecord> {
        self.embeddings.registered()
    }

    // ========================================================================
    // Tracking
    // ========================================================================

    /// Start a worker for `camera` reading `source` through `perception`.
    ///
    /// # Errors
    /// - `InvalidInput` if the camera is already being tracked
    pub fn start_camera<S, P>(&self, camera: CameraId, source: S, perception: P) -> Result<()>
    where
        S: FrameSource + 'static,
        P: Perception<S::Frame> + 'static,
    {
        Ok(self.tracker.start_camera(camera, source, perception)?)
    }

    /// Release one camera's frame source; its worker exits after the
    /// current tick. Returns false if the camera was never started.
    pub fn release_camera(&self, camera: CameraId) -> bool {
        self.tracker.release(camera)
    }

    /// Cameras with a running worker
    pub fn cameras(&self) -> Vec<CameraId> {
        self.tracker.cameras()
    }

    /// Whether any camera worker is running
    pub fn is_tracking(&self) -> bool {
        self.tracker.is_tracking()
    }

    /// Release every camera and wait for the workers to exit.
    pub fn shutdown(&self) {
        self.tracker.shutdown();
    }

    /// Route blacklist alerts to `sink`, replacing any previous sink.
    pub fn set_alert_sink(&self, sink: impl AlertSink + 'static) {
        self.alerts.set_sink(sink);
    }

    /// Stop routing alerts; hits are only logged.
    pub fn clear_alert_sink(&self) {
        self.alerts.clear_sink();
    }

    /// Alerts raised since open
    pub fn alerts_dispatched(&self) -> u64 {
        self.alerts.dispatched()
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Forget every registered identity and truncate the transition log.
    ///
    /// Person numbering restarts at `Person_001`. The blacklist and the
    /// request store are kept.
    ///
    /// # Errors
    /// - `Conflict` while any camera is being tracked
    pub fn reset(&self) -> Result<()> {
        if self.is_tracking() {
            return Err(Error::Conflict(
                "cannot reset while cameras are being tracked".to_string(),
            ));
        }
        self.embeddings.clear_registered()?;
        self.timeline.reset()?;
        info!(data_dir = %self.config.storage.data_dir.display(), "identities and log reset");
        Ok(())
    }

    /// Data directory, or `None` for an ephemeral instance
    pub fn data_dir(&self) -> Option<&Path> {
        self.durability_mode()
            .requires_disk()
            .then_some(self.config.storage.data_dir.as_path())
    }

    /// Durability mode of every store
    pub fn durability_mode(&self) -> DurabilityMode {
        self.config.storage.durability
    }

    /// Check if this instance never touches the disk.
    pub fn is_ephemeral(&self) -> bool {
        !self.durability_mode().requires_disk()
    }

    /// Effective configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// What the transition log replay found at open
    pub fn replayed(&self) -> &ReplayResult {
        self.timeline.replayed()
    }
}

impl Drop for Backtrack {
    fn drop(&mut self) {
        self.tracker.shutdown();
    }
}

/// Builder for a [`Backtrack`] instance.
///
/// # Example
///
/// ```ignore
/// // Audit deployment: every write fsynced
/// let bt = Backtrack::builder()
///     .path("/var/lib/backtrack")
///     .strict()
///     .threshold(0.6)
///     .open()?;
///
/// // Unit testing: no disk at all
/// let bt = Backtrack::ephemeral()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct BacktrackBuilder {
    config: Config,
}

impl BacktrackBuilder {
    /// Builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded from a loaded configuration.
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the data directory.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.storage.data_dir = PathBuf::from(path.as_ref());
        self
    }

    /// Set the durability mode.
    pub fn durability(mut self, mode: DurabilityMode) -> Self {
        self.config.storage.durability = mode;
        self
    }

    /// Keep everything in memory; no files are created or read.
    pub fn no_durability(self) -> Self {
        self.durability(DurabilityMode::None)
    }

    /// Flush every write (default).
    pub fn buffered(self) -> Self {
        self.durability(DurabilityMode::Buffered)
    }

    /// fsync every write.
    pub fn strict(self) -> Self {
        self.durability(DurabilityMode::Strict)
    }

    /// Identity match threshold.
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.config.identity.threshold = threshold;
        self
    }

    /// Possession distance threshold in pixels.
    pub fn proximity_threshold(mut self, pixels: f32) -> Self {
        self.config.tracking.proximity_threshold = pixels;
        self
    }

    /// Default budget for history lookups, in whole seconds.
    pub fn find_timeout_secs(mut self, secs: u64) -> Self {
        self.config.query.find_timeout_secs = secs;
        self
    }

    /// Interval between history polls.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.query.poll_interval_ms = interval.as_millis().max(1) as u64;
        self
    }

    /// Replay tolerance for the transition log.
    pub fn replay_options(mut self, options: ReplayOptions) -> Self {
        self.config.storage.max_corrupt_log_rows = options.max_corrupt_rows;
        self
    }

    /// Open with the configured settings.
    pub fn open(self) -> Result<Backtrack> {
        Backtrack::from_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ephemeral_creates_no_files() {
        let bt = Backtrack::ephemeral().unwrap();
        assert!(bt.is_ephemeral());
        assert!(bt.data_dir().is_none());
        assert!(!bt.is_tracking());
        let p = bt.resolve_identity(&[1.0, 2.0]).unwrap();
        assert_eq!(p.as_str(), "Person_001");
    }

    #[test]
    fn test_open_creates_directory_and_files() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("nested").join("data");
        let bt = Backtrack::open(&data).unwrap();
        assert_eq!(bt.data_dir(), Some(data.as_path()));
        assert!(data.join(TRACK_LOG_FILE).exists());

        bt.resolve_identity(&[0.0, 0.0]).unwrap();
        bt.blacklist.add("Mallory", &[9.0, 9.0]).unwrap();
        assert!(data.join(EMBEDDINGS_FILE).exists());
        assert!(data.join(BLACKLIST_FILE).exists());
    }

    #[test]
    fn test_builder_settings_reach_config() {
        let bt = Backtrack::builder()
            .no_durability()
            .threshold(0.4)
            .proximity_threshold(120.0)
            .find_timeout_secs(3)
            .poll_interval(Duration::from_millis(50))
            .open()
            .unwrap();
        let config = bt.config();
        assert_eq!(config.identity.threshold, 0.4);
        assert_eq!(config.tracking.proximity_threshold, 120.0);
        assert_eq!(config.query.find_timeout(), Duration::from_secs(3));
        assert_eq!(config.query.poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_invalid_builder_threshold() {
        let err = Backtrack::builder().no_durability().threshold(0.0).open();
        assert!(err.is_err());
    }

    #[test]
    fn test_reset_keeps_blacklist_and_requests() {
        let dir = TempDir::new().unwrap();
        let bt = Backtrack::open(dir.path()).unwrap();
        bt.resolve_identity(&[0.0]).unwrap();
        bt.resolve_identity(&[5.0]).unwrap();
        bt.blacklist.add("Mallory", &[9.0]).unwrap();
        bt.requests.create("Person_001", "laptop", "").unwrap();

        bt.reset().unwrap();
        assert!(bt.identities().is_empty());
        assert_eq!(bt.blacklist.list().len(), 1);
        assert_eq!(bt.requests.list().len(), 1);
        assert_eq!(bt.resolve_identity(&[5.0]).unwrap().as_str(), "Person_001");
    }
}
