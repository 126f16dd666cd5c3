use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

use crate::store::{Connection, ConnectionStore, DEFAULT_TTL_SECONDS};
use crate::utils::error::StorageError;

struct Entry<T> {
    expires_at: i64,
    value: T,
}

#[derive(Default)]
struct Inner {
    records: HashMap<String, Entry<Connection>>,
    ids: Vec<String>,
    channels: HashMap<String, Entry<Vec<String>>>,
}

/// In-process connection store (the `cache` storage driver).
///
/// Applies the same TTL semantics as [`crate::store::SledStore`]: reads
/// treat entries past their expiry as absent. The id set is kept without
/// an expiry of its own; `list_all` may therefore return ids whose record
/// already lapsed, which downstream readers tolerate.
pub struct MemoryStore {
    ttl_seconds: i64,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn fresh_expiry(&self) -> i64 {
        Utc::now().timestamp() + self.ttl_seconds
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECONDS)
    }
}

impl ConnectionStore for MemoryStore {
    fn put(&self, record: &Connection) -> Result<(), StorageError> {
        let expires_at = self.fresh_expiry();
        let mut inner = self.inner.lock().unwrap();

        inner.records.insert(
            record.connection_id.clone(),
            Entry {
                expires_at,
                value: record.clone(),
            },
        );

        if !inner.ids.iter().any(|id| id == &record.connection_id) {
            inner.ids.push(record.connection_id.clone());
        }

        Ok(())
    }

    fn get(&self, connection_id: &str) -> Result<Option<Connection>, StorageError> {
        let now = Utc::now().timestamp();
        let mut inner = self.inner.lock().unwrap();

        let expired = matches!(
            inner.records.get(connection_id),
            Some(entry) if entry.expires_at <= now
        );
        if expired {
            inner.records.remove(connection_id);
            return Ok(None);
        }

        Ok(inner
            .records
            .get(connection_id)
            .map(|entry| entry.value.clone()))
    }

    fn remove(&self, connection_id: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        inner.records.remove(connection_id);
        inner.ids.retain(|id| id != connection_id);
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.inner.lock().unwrap().ids.clone())
    }

    fn channel_members(&self, channel: &str) -> Result<Vec<String>, StorageError> {
        let now = Utc::now().timestamp();
        let mut inner = self.inner.lock().unwrap();

        let expired = matches!(
            inner.channels.get(channel),
            Some(entry) if entry.expires_at <= now
        );
        if expired {
            inner.channels.remove(channel);
            return Ok(Vec::new());
        }

        Ok(inner
            .channels
            .get(channel)
            .map(|entry| entry.value.clone())
            .unwrap_or_default())
    }

    fn set_channel_members(&self, channel: &str, members: &[String]) -> Result<(), StorageError> {
        let expires_at = self.fresh_expiry();
        let mut inner = self.inner.lock().unwrap();
        inner.channels.insert(
            channel.to_string(),
            Entry {
                expires_at,
                value: members.to_vec(),
            },
        );
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}
