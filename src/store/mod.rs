//! The `store` module provides persistence for connection records, the
//! global connection set, and channel member lists.
//!
//! Two drivers implement the [`ConnectionStore`] trait: [`SledStore`] keeps
//! state in an embedded `sled` database (the `database` driver) and
//! [`MemoryStore`] keeps it in process memory (the `cache` driver). Both
//! attach a TTL to every entry and treat expired entries as absent on read.
//!
//! Writes that touch more than one key (record + connection set, record +
//! channel list) are sequential and not transactional; concurrent writers
//! on the same id can interleave, last writer wins per key. The store is a
//! shared cache, not a transactional database.

pub mod connection;
pub mod memory_store;
pub mod sled_store;

pub use connection::Connection;
pub use memory_store::MemoryStore;
pub use sled_store::SledStore;

use chrono::Utc;

use crate::utils::error::StorageError;

/// Default TTL applied to every stored entry, in seconds.
pub const DEFAULT_TTL_SECONDS: i64 = 86_400;

/// Default staleness threshold for [`ConnectionStore::sweep_stale`], in
/// minutes. Matches the default TTL.
pub const DEFAULT_MAX_AGE_MINUTES: i64 = 1440;

/// Key-value persistence for connections and channel membership.
pub trait ConnectionStore: Send + Sync {
    /// Upserts a connection record and adds its id to the connection set.
    /// Both writes refresh the TTL.
    fn put(&self, record: &Connection) -> Result<(), StorageError>;

    /// Returns the current record, or `None` if it is missing or expired.
    fn get(&self, connection_id: &str) -> Result<Option<Connection>, StorageError>;

    /// Deletes the record and removes the id from the connection set.
    /// Removing an absent id is not an error.
    fn remove(&self, connection_id: &str) -> Result<(), StorageError>;

    fn exists(&self, connection_id: &str) -> Result<bool, StorageError> {
        Ok(self.get(connection_id)?.is_some())
    }

    /// Snapshot of the connection set. May still contain ids whose record
    /// already expired; downstream readers re-fetch and skip those.
    fn list_all(&self) -> Result<Vec<String>, StorageError>;

    /// Member ids of a channel; empty if the channel has no entry.
    fn channel_members(&self, channel: &str) -> Result<Vec<String>, StorageError>;

    /// Replaces a channel's member list, refreshing its TTL.
    fn set_channel_members(&self, channel: &str, members: &[String]) -> Result<(), StorageError>;

    /// Removes every connection whose record is absent or older than
    /// `max_age_minutes`. Returns the number removed.
    fn sweep_stale(&self, max_age_minutes: i64) -> Result<usize, StorageError> {
        let now = Utc::now();
        let mut removed = 0;

        for connection_id in self.list_all()? {
            let stale = match self.get(&connection_id)? {
                Some(record) => record.age_minutes(now) > max_age_minutes,
                None => true,
            };

            if stale {
                self.remove(&connection_id)?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
