//! The `transport` module is the outbound push seam: how serialized
//! payloads reach a connection on the wire.
//!
//! The registry core only depends on the [`Transport`] trait. Deployments
//! against a managed gateway implement it with their gateway management
//! client; [`LocalTransport`] is the in-process implementation used for
//! loopback deployments and tests. Timeouts and retries are the
//! implementation's responsibility, not the core's.

pub mod local;

pub use local::LocalTransport;

use async_trait::async_trait;

use crate::utils::error::TransportError;

/// Pushes bytes to a single connection.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers `data` to the connection, at most once.
    ///
    /// Reports [`TransportError::Gone`] when the connection no longer
    /// exists on the wire, which callers treat as a prune signal.
    async fn post_to_connection(&self, connection_id: &str, data: &str)
    -> Result<(), TransportError>;
}
