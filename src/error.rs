//! Unified error types for Backtrack.
//!
//! This module provides a clean error type that wraps internal errors
//! and presents a consistent interface to users.

use thiserror::Error;

/// All Backtrack errors.
///
/// This is the canonical error type for all public operations.
/// Lookups that simply find nothing return `Option`, not an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Addressed entity does not exist (request, blacklist entry, person)
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller input was rejected (bad embedding, unknown label, bad config)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Operation not allowed in the current state
    #[error("conflict: {0}")]
    Conflict(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A durable store holds malformed data
    #[error("corrupt data: {0}")]
    Corruption(String),

    /// Encoding or writing a store failed
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for Backtrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if the caller's input was rejected.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }

    /// Check if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }

    /// Check if a durable store failed to load.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::Corruption(_))
    }
}

// Convert from internal core errors
impl From<backtrack_core::Error> for Error {
    fn from(e: backtrack_core::Error) -> Self {
        use backtrack_core::Error as CoreError;
        match e {
            CoreError::InvalidInput { message } => Error::InvalidInput(message),
            e @ CoreError::DimensionMismatch { .. } => Error::InvalidInput(e.to_string()),
            e @ CoreError::UnknownLabel { .. } => Error::InvalidInput(e.to_string()),
            CoreError::NotFound { entity } => Error::NotFound(entity),
            e @ CoreError::InvalidTransition { .. } => Error::Conflict(e.to_string()),
            CoreError::Io(io_err) => Error::Io(io_err),
            CoreError::Corruption { path, message } => {
                Error::Corruption(format!("{}: {}", path.display(), message))
            }
            CoreError::Serialization { message } => Error::Storage(message),
        }
    }
}

// Configuration files
impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::InvalidInput(format!("config: {}", e))
    }
}
