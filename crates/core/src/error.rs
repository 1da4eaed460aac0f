//! Error types shared by every Backtrack crate
//!
//! Errors fall into the categories the tracker cares about:
//!
//! | Category | Variants | Handling |
//! |----------|----------|----------|
//! | Input | `InvalidInput`, `DimensionMismatch`, `UnknownLabel` | surfaced to caller, no retry |
//! | Lookup miss | `NotFound` | typed "not found", distinct from a failure |
//! | Workflow | `InvalidTransition` | request already left `pending` |
//! | I/O | `Io` | transient in the tick loop, surfaced elsewhere |
//! | Startup | `Corruption`, `Serialization` | fail fast, never discard records |
//!
//! Read-style lookups return `Option` instead of `NotFound`; the variant is
//! reserved for mutations that address a record that does not exist.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Backtrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the core stores and workflows
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied a value the operation cannot accept
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input
        message: String,
    },

    /// Embedding length differs from the records already stored
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension of the stored records
        expected: usize,
        /// Dimension of the supplied embedding
        got: usize,
    },

    /// Object label outside the trackable allow-list
    #[error("unknown object label: {label}")]
    UnknownLabel {
        /// The rejected label
        label: String,
    },

    /// Addressed record does not exist
    #[error("not found: {entity}")]
    NotFound {
        /// Description of the missing entity (e.g. `request req_4`)
        entity: String,
    },

    /// Workflow transition not allowed from the current state
    #[error("invalid transition for {id}: {from} -> {to}")]
    InvalidTransition {
        /// Record identifier
        id: String,
        /// Current state
        from: String,
        /// Requested state
        to: String,
    },

    /// Underlying file system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A durable store holds malformed data
    #[error("corrupt store {}: {message}", path.display())]
    Corruption {
        /// File that failed to parse
        path: PathBuf,
        /// Parser diagnostic
        message: String,
    },

    /// Encoding a record failed
    #[error("serialization error: {message}")]
    Serialization {
        /// Encoder diagnostic
        message: String,
    },
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::NotFound`]
    pub fn not_found(entity: impl Into<String>) -> Self {
        Error::NotFound {
            entity: entity.into(),
        }
    }

    /// Shorthand for [`Error::Corruption`]
    pub fn corruption(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Corruption {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Stable error code, one per variant
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidInput { .. } => "InvalidInput",
            Error::DimensionMismatch { .. } => "DimensionMismatch",
            Error::UnknownLabel { .. } => "UnknownLabel",
            Error::NotFound { .. } => "NotFound",
            Error::InvalidTransition { .. } => "InvalidTransition",
            Error::Io(_) => "Io",
            Error::Corruption { .. } => "Corruption",
            Error::Serialization { .. } => "Serialization",
        }
    }

    /// True for errors caused by the caller's input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput { .. } | Error::DimensionMismatch { .. } | Error::UnknownLabel { .. }
        )
    }

    /// True for lookup misses
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// True when a durable store could not be loaded
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corruption { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization {
            message: e.to_string(),
        }
    }
}
