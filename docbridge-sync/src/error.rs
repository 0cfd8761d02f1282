//! Error types for the sync layer.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport-level HTTP error (connection, timeout, body decode).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A remote answered with an unexpected status.
    #[error("{operation} failed with status {status}")]
    Status { operation: &'static str, status: u16 },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The hashing tool could not be started.
    #[error("failed to spawn hasher: {0}")]
    HasherSpawn(std::io::Error),

    /// The hashing tool ran but failed.
    #[error("hasher exited with status {status}: {stderr}")]
    HasherFailed { status: i32, stderr: String },

    /// The hashing tool produced an unusable key.
    #[error("hasher produced an unusable key: {0}")]
    HasherOutput(#[from] docbridge_types::Error),

    /// Tracker state could not be loaded or saved.
    #[error("state store error: {0}")]
    Store(#[from] docbridge_store::StoreError),
}
