//! Error types for syncal.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in syncal operations.
#[derive(Error, Debug)]
pub enum SyncalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load sync state from {path}: {reason}")]
    StateLoad { path: PathBuf, reason: String },

    #[error("Failed to save sync state to {path}: {reason}")]
    StateSave { path: PathBuf, reason: String },

    #[error("Source '{source_name}' failed: {reason}")]
    Source { source_name: String, reason: String },

    #[error("Destination '{destination}' failed: {reason}")]
    Destination { destination: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for syncal operations.
pub type SyncalResult<T> = Result<T, SyncalError>;
