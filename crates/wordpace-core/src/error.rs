//! Core error types for wordpace-core.
//!
//! This module defines the error hierarchy using thiserror. Scheduling
//! absences (nothing due on a date, missing references) are deliberately
//! not errors; they surface as `None` from the schedule APIs.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::PhaseTag;

/// Core error type for wordpace-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Test-session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Store migration failed: {0}")]
    MigrationFailed(String),

    /// A persisted record could not be decoded
    #[error("Malformed {what} record: {message}")]
    Corrupt { what: String, message: String },

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// Filesystem errors while locating or creating the data directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration directory could not be located or created
    #[error("Cannot locate configuration directory: {0}")]
    Directory(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

/// Test-session errors.
///
/// These are caller contract violations; the session itself never fails
/// once it is running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session was handed a lesson with no words
    #[error("Cannot start a test session with an empty word list")]
    EmptyWordList,

    /// A command was issued that the current phase does not accept
    #[error("Cannot {action} during the {phase} phase")]
    PhaseMismatch {
        action: &'static str,
        phase: PhaseTag,
    },

    /// A multiple-choice pick was outside the option list
    #[error("Choice {index} out of range for {len} options")]
    ChoiceOutOfRange { index: usize, len: usize },
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
