//! Persistence error types.

use thiserror::Error;

/// Errors from encoding or decoding a stack snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Encoding to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Decoding from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot was written by an unsupported format version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot decoded but its contents are inconsistent
    #[error("Snapshot validation failed: {0}")]
    ValidationFailed(String),
}

/// Errors from a stack repository
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The backing store could not be reached
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}
