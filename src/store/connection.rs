use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single live client session tracked by the registry.
///
/// The record is owned exclusively by the connection store: it is created
/// when the gateway reports `$connect`, mutated on channel join/leave, and
/// destroyed on `$disconnect`, on a transport-confirmed gone condition, or
/// by the staleness sweep.
///
/// # Fields
///
/// - `connection_id` - Opaque unique id assigned by the transport.
/// - `connected_at` - When the connection was established (UTC).
/// - `user_id` - Optional authenticated user behind the connection.
/// - `route_key` - The last route key seen for this connection.
/// - `channels` - Names of the channels the connection has joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub connection_id: String,
    pub connected_at: DateTime<Utc>,
    pub user_id: Option<i64>,
    pub route_key: String,
    #[serde(default)]
    pub channels: Vec<String>,
}

impl Connection {
    /// Creates a fresh record with `connected_at` set to now and no channel
    /// memberships.
    pub fn new(connection_id: &str, route_key: &str, user_id: Option<i64>) -> Self {
        Self {
            connection_id: connection_id.to_string(),
            connected_at: Utc::now(),
            user_id,
            route_key: route_key.to_string(),
            channels: Vec::new(),
        }
    }

    /// Minutes elapsed since the connection was established.
    pub fn age_minutes(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.connected_at).num_minutes()
    }
}
