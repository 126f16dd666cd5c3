use std::sync::Arc;

use crate::notify::{Notification, Notifier};
use crate::store::ConnectionStore;
use crate::utils::error::StorageError;

/// Bidirectional mapping between channels and connection ids, kept
/// consistent on every join/leave.
///
/// The mapping is stored in two places: each connection record carries its
/// `channels` list, and each channel key holds its member id list. A join
/// or leave updates both sides with sequential writes; a crash in between
/// can leave a transient divergence, which readers tolerate.
pub struct ChannelIndex {
    store: Arc<dyn ConnectionStore>,
    notifier: Notifier,
}

impl ChannelIndex {
    pub fn new(store: Arc<dyn ConnectionStore>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    /// Adds a connection to a channel. Returns `false` if the connection
    /// does not exist.
    ///
    /// Duplicate joins are idempotent on membership but still emit the
    /// `channel.joined` notification each time.
    pub fn join(&self, connection_id: &str, channel: &str) -> Result<bool, StorageError> {
        let Some(mut record) = self.store.get(connection_id)? else {
            return Ok(false);
        };

        let mut members = self.store.channel_members(channel)?;
        if !members.iter().any(|id| id == connection_id) {
            members.push(connection_id.to_string());
        }
        self.store.set_channel_members(channel, &members)?;

        if !record.channels.iter().any(|name| name == channel) {
            record.channels.push(channel.to_string());
        }
        self.store.put(&record)?;

        self.notifier.emit(Notification::ChannelJoined {
            connection_id: connection_id.to_string(),
            channel: channel.to_string(),
        });

        Ok(true)
    }

    /// Removes a connection from a channel. Returns `false` if the
    /// connection does not exist; leaving a channel the connection never
    /// joined is a no-op and still succeeds.
    pub fn leave(&self, connection_id: &str, channel: &str) -> Result<bool, StorageError> {
        let Some(mut record) = self.store.get(connection_id)? else {
            return Ok(false);
        };

        let mut members = self.store.channel_members(channel)?;
        members.retain(|id| id != connection_id);
        self.store.set_channel_members(channel, &members)?;

        record.channels.retain(|name| name != channel);
        self.store.put(&record)?;

        self.notifier.emit(Notification::ChannelLeft {
            connection_id: connection_id.to_string(),
            channel: channel.to_string(),
        });

        Ok(true)
    }

    /// Member ids of a channel, in join order.
    pub fn members_of(&self, channel: &str) -> Result<Vec<String>, StorageError> {
        self.store.channel_members(channel)
    }

    /// Channels a connection has joined; empty if the connection is absent.
    pub fn channels_of(&self, connection_id: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .store
            .get(connection_id)?
            .map(|record| record.channels)
            .unwrap_or_default())
    }

    /// Every channel with at least one live member, duplicates collapsed.
    pub fn all_channels(&self) -> Result<Vec<String>, StorageError> {
        let mut channels: Vec<String> = Vec::new();

        for connection_id in self.store.list_all()? {
            // Skip ids whose record expired out from under the set.
            let Some(record) = self.store.get(&connection_id)? else {
                continue;
            };
            for channel in record.channels {
                if !channels.contains(&channel) {
                    channels.push(channel);
                }
            }
        }

        Ok(channels)
    }
}
