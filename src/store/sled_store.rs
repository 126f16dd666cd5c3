use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use sled::Db;

use crate::store::{Connection, ConnectionStore};
use crate::utils::error::StorageError;

/// Envelope wrapping every persisted value with its expiry instant.
///
/// `sled` has no native TTL, so expiry is enforced on read: an entry past
/// `expires_at` behaves as absent and is lazily deleted.
#[derive(serde::Serialize, serde::Deserialize)]
struct Envelope<T> {
    expires_at: i64,
    value: T,
}

/// Connection store backed by an embedded `sled` database (the `database`
/// storage driver).
///
/// Key layout, under the configured prefix:
/// `<prefix>:connection:<id>` for records, `<prefix>:connections` for the
/// global id set, and `<prefix>:channel:<name>` for member lists. Every
/// write refreshes the entry's TTL.
#[derive(Clone)]
pub struct SledStore {
    db: Db,
    key_prefix: String,
    ttl_seconds: i64,
}

impl SledStore {
    pub fn new(path: &str, key_prefix: &str, ttl_seconds: i64) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self {
            db,
            key_prefix: key_prefix.to_string(),
            ttl_seconds,
        })
    }

    fn connection_key(&self, connection_id: &str) -> String {
        format!("{}:connection:{}", self.key_prefix, connection_id)
    }

    fn set_key(&self) -> String {
        format!("{}:connections", self.key_prefix)
    }

    fn channel_key(&self, channel: &str) -> String {
        format!("{}:channel:{}", self.key_prefix, channel)
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let envelope = Envelope {
            expires_at: Utc::now().timestamp() + self.ttl_seconds,
            value,
        };
        let bytes = serde_json::to_vec(&envelope)?;
        self.db.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(bytes) = self.db.get(key.as_bytes())? else {
            return Ok(None);
        };

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        if envelope.expires_at <= Utc::now().timestamp() {
            self.db.remove(key.as_bytes())?;
            return Ok(None);
        }

        Ok(Some(envelope.value))
    }
}

impl ConnectionStore for SledStore {
    fn put(&self, record: &Connection) -> Result<(), StorageError> {
        self.write(&self.connection_key(&record.connection_id), record)?;

        // Second, independent key write; not atomic with the record.
        let mut ids: Vec<String> = self.read(&self.set_key())?.unwrap_or_default();
        if !ids.iter().any(|id| id == &record.connection_id) {
            ids.push(record.connection_id.clone());
        }
        self.write(&self.set_key(), &ids)
    }

    fn get(&self, connection_id: &str) -> Result<Option<Connection>, StorageError> {
        self.read(&self.connection_key(connection_id))
    }

    fn remove(&self, connection_id: &str) -> Result<(), StorageError> {
        self.db
            .remove(self.connection_key(connection_id).as_bytes())?;

        let ids: Vec<String> = self.read(&self.set_key())?.unwrap_or_default();
        let remaining: Vec<String> = ids.into_iter().filter(|id| id != connection_id).collect();
        self.write(&self.set_key(), &remaining)
    }

    fn list_all(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.read(&self.set_key())?.unwrap_or_default())
    }

    fn channel_members(&self, channel: &str) -> Result<Vec<String>, StorageError> {
        Ok(self.read(&self.channel_key(channel))?.unwrap_or_default())
    }

    fn set_channel_members(&self, channel: &str, members: &[String]) -> Result<(), StorageError> {
        self.write(&self.channel_key(channel), &members)
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("db", &"sled::Db")
            .field("key_prefix", &self.key_prefix)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}
