//! Durability mode for record stores and the transition log.
//!
//! Defines how hard each durable write tries to reach the disk.

use serde::{Deserialize, Serialize};

/// Durability mode for durable writes.
///
/// # Mode Comparison
///
/// | Mode | Files | fsync | Use Case |
/// |------|-------|-------|----------|
/// | None | none | never | Tests, ephemeral trackers |
/// | Buffered | yes | never (flush only) | Default deployments |
/// | Strict | yes | every write | Audit-grade custody records |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurabilityMode {
    /// No durability - everything lives in memory and is lost on exit.
    ///
    /// No files are created or read.
    None,

    /// Flush every write to the OS, let it decide when to hit the disk.
    ///
    /// A crash of the process loses nothing; a power loss may lose the
    /// most recent writes.
    #[default]
    Buffered,

    /// fsync after every write (slowest, maximum durability).
    Strict,
}

impl DurabilityMode {
    /// Check if this mode touches the file system at all.
    pub fn requires_disk(&self) -> bool {
        !matches!(self, DurabilityMode::None)
    }

    /// Check if this mode requires fsync on every write.
    pub fn requires_fsync(&self) -> bool {
        matches!(self, DurabilityMode::Strict)
    }

    /// Parse a configuration value (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "memory" | "ephemeral" => Some(DurabilityMode::None),
            "buffered" => Some(DurabilityMode::Buffered),
            "strict" => Some(DurabilityMode::Strict),
            _ => None,
        }
    }

    /// Human-readable description of the mode.
    pub fn description(&self) -> &'static str {
        match self {
            DurabilityMode::None => "No durability (in memory, all data lost on exit)",
            DurabilityMode::Buffered => "Buffered writes (flushed, not fsynced)",
            DurabilityMode::Strict => "Sync fsync (safest, slowest)",
        }
    }
}
