//! Custom error types for the user directory
//!
//! This module defines the error hierarchy shared by the store, the audit
//! trail and the service layer, using thiserror for the definitions.

use thiserror::Error;

/// The main error type for user directory operations
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The caller passed something that can never identify a record
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Field validation errors (raised by the presentation layer only)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors (lock poisoning, snapshot files)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl DirectoryError {
    /// Create a "not found" error for any entity kind
    pub fn not_found(entity_type: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::not_found("User", identifier)
    }

    /// Create a "not found" error for log entries
    pub fn log_entry_not_found(identifier: impl Into<String>) -> Self {
        Self::not_found("LogEntry", identifier)
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

impl From<std::io::Error> for DirectoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for user directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;
