use std::collections::HashMap;
use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::store::ConnectionStore;
use crate::transport::Transport;
use crate::utils::error::{StorageError, TransportError};

/// Best-effort, at-most-once delivery of payloads to one or many
/// connections.
///
/// Sends are independent per recipient; one failure never aborts the rest,
/// and no ordering is guaranteed across recipients. A transport-reported
/// gone condition evicts the connection from the store.
pub struct Fanout {
    transport: Arc<dyn Transport>,
    store: Arc<dyn ConnectionStore>,
    max_in_flight: usize,
}

impl Fanout {
    /// Bound on concurrent in-flight sends during `send_many`/`broadcast`.
    pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

    pub fn new(transport: Arc<dyn Transport>, store: Arc<dyn ConnectionStore>) -> Self {
        Self {
            transport,
            store,
            max_in_flight: Self::DEFAULT_MAX_IN_FLIGHT,
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Delivers a payload to a single connection.
    ///
    /// Returns `false` on any failure. A gone connection is additionally
    /// removed from the store; other transport failures are only logged.
    pub async fn send_one(&self, connection_id: &str, payload: &Value) -> bool {
        let data = payload.to_string();

        match self.transport.post_to_connection(connection_id, &data).await {
            Ok(()) => true,
            Err(TransportError::Gone) => {
                debug!(connection_id, "connection gone, evicting");
                if let Err(err) = self.store.remove(connection_id) {
                    warn!(connection_id, error = %err, "failed to evict gone connection");
                }
                false
            }
            Err(err) => {
                error!(connection_id, error = %err, "failed to deliver payload");
                false
            }
        }
    }

    /// Delivers a payload to every listed connection, with bounded
    /// parallelism. Returns per-connection delivery outcomes.
    pub async fn send_many(
        &self,
        connection_ids: &[String],
        payload: &Value,
    ) -> HashMap<String, bool> {
        stream::iter(connection_ids)
            .map(|connection_id| async move {
                let delivered = self.send_one(connection_id, payload).await;
                (connection_id.clone(), delivered)
            })
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await
    }

    /// Delivers a payload to every connection currently in the store.
    pub async fn broadcast(
        &self,
        payload: &Value,
    ) -> Result<HashMap<String, bool>, StorageError> {
        let connection_ids = self.store.list_all()?;
        Ok(self.send_many(&connection_ids, payload).await)
    }
}
