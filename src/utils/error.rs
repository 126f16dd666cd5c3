//! The `error` module defines the error types used across the `wsgate`
//! application.
//!
//! Two failure domains exist: the persistence backend and the outbound
//! transport. Backend failures propagate to the caller as `StorageError`;
//! delivery failures never escape the fan-out layer as errors and are
//! reported per recipient instead.

use thiserror::Error;

/// A failure reported by the persistence backend.
///
/// A missing key is never an error; stores map it to absent.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend itself is unavailable or refused the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored value could not be encoded or decoded.
    #[error("failed to encode stored value: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// A failure reported by the outbound transport while pushing to a
/// connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection no longer exists on the wire. Terminal: the caller
    /// should evict the connection from the store.
    #[error("connection is gone")]
    Gone,

    /// Any other delivery failure. The send is not retried.
    #[error("delivery failed: {0}")]
    Failed(String),
}
