//! The `notify` module carries side-effect notifications out of the
//! registry core.
//!
//! Every lifecycle and membership mutation emits a [`Notification`] that
//! application code can consume (push to an event bus, trigger webhooks,
//! log). Emission is fire-and-forget over an unbounded channel; when
//! notifications are disabled by configuration the emissions are dropped.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A side-effect notification emitted by the registry.
///
/// `Custom` carries the literal route key as data rather than being baked
/// into a string-built event name, so consumers can match on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    Connected {
        connection_id: String,
    },
    Disconnected {
        connection_id: String,
    },
    Message {
        connection_id: String,
        payload: Value,
    },
    Custom {
        route: String,
        connection_id: String,
        payload: Value,
    },
    ChannelJoined {
        connection_id: String,
        channel: String,
    },
    ChannelLeft {
        connection_id: String,
        channel: String,
    },
}

/// Handle for emitting notifications.
///
/// Cloneable; every component holding a clone feeds the same receiver.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: Option<UnboundedSender<Notification>>,
}

impl Notifier {
    /// Creates an enabled notifier and the receiving end of its channel.
    pub fn new() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// Creates a notifier that drops every emission. Used when
    /// `notifications.enabled` is off.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Emits a notification. Never fails: a dropped receiver only logs.
    pub fn emit(&self, notification: Notification) {
        if let Some(sender) = &self.sender {
            if sender.send(notification).is_err() {
                tracing::debug!("notification receiver dropped, emission discarded");
            }
        }
    }
}
