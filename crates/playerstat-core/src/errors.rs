//! Error types for status reporting
//!
//! Producers never see these: setters and log appends are total. Errors only
//! flow out of the persistence and notification paths, where the reporter turns
//! them into log entries and cycle outcomes.

use std::path::PathBuf;

// ----------------------------------------------------------------------------
// Status Error
// ----------------------------------------------------------------------------

/// Errors raised while persisting or publishing a status snapshot
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("Status file {} is locked by another writer", path.display())]
    LockContention { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Status notification rejected: {0}")]
    Rejected(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StatusError {
    /// Lock contention means another cycle owns the file; the caller skips
    /// this cycle instead of treating it as a failure.
    pub fn is_contention(&self) -> bool {
        matches!(self, StatusError::LockContention { .. })
    }
}

pub type Result<T> = std::result::Result<T, StatusError>;
