//! Configuration for a Backtrack instance.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [storage]
//! data_dir = "data"
//! durability = "buffered"   # strict | buffered | none
//! max_corrupt_log_rows = 0
//!
//! [identity]
//! threshold = 0.7
//!
//! [tracking]
//! proximity_threshold = 200.0
//!
//! [query]
//! find_timeout_secs = 20
//! poll_interval_ms = 200
//! ```
//!
//! Every section and key is optional. `BACKTRACK_DATA_DIR` and
//! `BACKTRACK_THRESHOLD` override the file.

use crate::error::{Error, Result};
use backtrack_durability::ReplayOptions;
use backtrack_primitives::DEFAULT_THRESHOLD;
use backtrack_storage::DurabilityMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "backtrack.toml";

/// Environment variable overriding `storage.data_dir`
pub const ENV_DATA_DIR: &str = "BACKTRACK_DATA_DIR";

/// Environment variable overriding `identity.threshold`
pub const ENV_THRESHOLD: &str = "BACKTRACK_THRESHOLD";

/// Backtrack configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where and how durable state is kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// Identity matching
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Possession classification
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Polling lookups
    #[serde(default)]
    pub query: QueryConfig,
}

/// `[storage]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the stores and the transition log
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Durability mode for every store
    #[serde(default)]
    pub durability: DurabilityMode,

    /// Malformed log rows tolerated on replay before open fails
    #[serde(default)]
    pub max_corrupt_log_rows: usize,
}

/// `[identity]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Maximum Euclidean distance for a match
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

/// `[tracking]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Face to object distance, in pixels, below which an object is held
    #[serde(default = "default_proximity")]
    pub proximity_threshold: f32,
}

/// `[query]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Default budget for object history lookups
    #[serde(default = "default_find_timeout")]
    pub find_timeout_secs: u64,

    /// Interval between polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

fn default_proximity() -> f32 {
    backtrack_engine::DEFAULT_PROXIMITY_THRESHOLD
}

fn default_find_timeout() -> u64 {
    20
}

fn default_poll_interval() -> u64 {
    200
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            durability: DurabilityMode::default(),
            max_corrupt_log_rows: 0,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: default_proximity(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            find_timeout_secs: default_find_timeout(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            identity: IdentityConfig::default(),
            tracking: TrackingConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl QueryConfig {
    /// Default lookup budget
    pub fn find_timeout(&self) -> Duration {
        Duration::from_secs(self.find_timeout_secs)
    }

    /// Poll interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl StorageConfig {
    /// Replay tolerance for the transition log
    pub fn replay_options(&self) -> ReplayOptions {
        ReplayOptions {
            max_corrupt_rows: self.max_corrupt_log_rows,
        }
    }
}

impl Config {
    /// Parse TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::InvalidInput(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from `path`, or from `backtrack.toml` in the working directory,
    /// or fall back to defaults. Environment overrides apply last.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    debug!(path = %local.display(), "loading config");
                    Self::from_file(local)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides read through `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            if !dir.trim().is_empty() {
                self.storage.data_dir = PathBuf::from(dir);
            }
        }
        if let Some(value) = lookup(ENV_THRESHOLD) {
            self.identity.threshold = value.trim().parse().map_err(|_| {
                Error::InvalidInput(format!("{} is not a number: {:?}", ENV_THRESHOLD, value))
            })?;
        }
        self.validate()
    }

    /// Reject values no store would accept.
    pub fn validate(&self) -> Result<()> {
        let t = self.identity.threshold;
        if !t.is_finite() || t <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "identity.threshold must be positive, got {}",
                t
            )));
        }
        let p = self.tracking.proximity_threshold;
        if !p.is_finite() || p <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "tracking.proximity_threshold must be positive, got {}",
                p
            )));
        }
        if self.query.poll_interval_ms == 0 {
            return Err(Error::InvalidInput(
                "query.poll_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
