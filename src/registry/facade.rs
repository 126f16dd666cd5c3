use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::channel::ChannelIndex;
use crate::dispatch::{Dispatcher, Response};
use crate::fanout::Fanout;
use crate::notify::Notifier;
use crate::store::{Connection, ConnectionStore, DEFAULT_MAX_AGE_MINUTES};
use crate::transport::Transport;
use crate::utils::error::StorageError;

/// Point-in-time registry statistics, computed from a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total_connections: usize,
    pub total_channels: usize,
    pub channels: HashMap<String, usize>,
}

/// The combined read/write API over the registry, used by external callers
/// (HTTP endpoints, CLI, schedulers).
///
/// Holds no mutable state of its own; all durable state lives in the
/// injected store, so any number of facade instances over the same store
/// behave as one registry.
pub struct Registry {
    store: Arc<dyn ConnectionStore>,
    channels: ChannelIndex,
    dispatcher: Dispatcher,
    fanout: Fanout,
    sweep_max_age_minutes: i64,
}

impl Registry {
    pub fn new(
        store: Arc<dyn ConnectionStore>,
        transport: Arc<dyn Transport>,
        notifier: Notifier,
    ) -> Self {
        Self {
            channels: ChannelIndex::new(store.clone(), notifier.clone()),
            dispatcher: Dispatcher::new(store.clone(), notifier),
            fanout: Fanout::new(transport, store.clone()),
            store,
            sweep_max_age_minutes: DEFAULT_MAX_AGE_MINUTES,
        }
    }

    /// Overrides the staleness threshold used by [`Registry::cleanup`].
    pub fn with_sweep_max_age(mut self, minutes: i64) -> Self {
        self.sweep_max_age_minutes = minutes;
        self
    }

    // ---- write paths ----

    pub async fn send_to_connection(&self, connection_id: &str, data: &Value) -> bool {
        self.fanout.send_one(connection_id, data).await
    }

    pub async fn send_to_connections(
        &self,
        connection_ids: &[String],
        data: &Value,
    ) -> HashMap<String, bool> {
        self.fanout.send_many(connection_ids, data).await
    }

    pub async fn broadcast(&self, data: &Value) -> Result<HashMap<String, bool>, StorageError> {
        self.fanout.broadcast(data).await
    }

    pub async fn send_to_user(
        &self,
        user_id: i64,
        data: &Value,
    ) -> Result<HashMap<String, bool>, StorageError> {
        let connection_ids = self.connections_by_user(user_id)?;
        Ok(self.send_to_connections(&connection_ids, data).await)
    }

    pub async fn send_to_users(
        &self,
        user_ids: &[i64],
        data: &Value,
    ) -> Result<HashMap<i64, HashMap<String, bool>>, StorageError> {
        let mut results = HashMap::new();
        for &user_id in user_ids {
            results.insert(user_id, self.send_to_user(user_id, data).await?);
        }
        Ok(results)
    }

    pub async fn send_to_channel(
        &self,
        channel: &str,
        data: &Value,
    ) -> Result<HashMap<String, bool>, StorageError> {
        let connection_ids = self.channels.members_of(channel)?;
        Ok(self.send_to_connections(&connection_ids, data).await)
    }

    pub fn join_channel(&self, connection_id: &str, channel: &str) -> Result<bool, StorageError> {
        self.channels.join(connection_id, channel)
    }

    pub fn leave_channel(&self, connection_id: &str, channel: &str) -> Result<bool, StorageError> {
        self.channels.leave(connection_id, channel)
    }

    /// Routes an inbound lifecycle event; always yields a response.
    pub fn handle(&self, event: &Value) -> Response {
        self.dispatcher.handle(event)
    }

    /// Sweeps connections older than the configured threshold. Returns the
    /// number removed.
    pub fn cleanup(&self) -> Result<usize, StorageError> {
        self.store.sweep_stale(self.sweep_max_age_minutes)
    }

    // ---- read paths ----

    pub fn connections_by_user(&self, user_id: i64) -> Result<Vec<String>, StorageError> {
        let mut connection_ids = Vec::new();

        for connection_id in self.store.list_all()? {
            if let Some(record) = self.store.get(&connection_id)? {
                if record.user_id == Some(user_id) {
                    connection_ids.push(connection_id);
                }
            }
        }

        Ok(connection_ids)
    }

    pub fn connections_by_channel(&self, channel: &str) -> Result<Vec<String>, StorageError> {
        self.channels.members_of(channel)
    }

    pub fn channels_of_connection(&self, connection_id: &str) -> Result<Vec<String>, StorageError> {
        self.channels.channels_of(connection_id)
    }

    pub fn all_channels(&self) -> Result<Vec<String>, StorageError> {
        self.channels.all_channels()
    }

    pub fn get_connection(&self, connection_id: &str) -> Result<Option<Connection>, StorageError> {
        self.store.get(connection_id)
    }

    pub fn connection_exists(&self, connection_id: &str) -> Result<bool, StorageError> {
        self.store.exists(connection_id)
    }

    pub fn all_connections(&self) -> Result<Vec<String>, StorageError> {
        self.store.list_all()
    }

    /// Computes statistics from a fresh snapshot; nothing is cached.
    pub fn stats(&self) -> Result<Stats, StorageError> {
        let connection_ids = self.store.list_all()?;
        let mut channels: HashMap<String, usize> = HashMap::new();

        for connection_id in &connection_ids {
            let Some(record) = self.store.get(connection_id)? else {
                continue;
            };
            for channel in record.channels {
                *channels.entry(channel).or_insert(0) += 1;
            }
        }

        Ok(Stats {
            total_connections: connection_ids.len(),
            total_channels: channels.len(),
            channels,
        })
    }
}
