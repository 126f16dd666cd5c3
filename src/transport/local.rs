use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::transport::Transport;
use crate::utils::error::TransportError;

/// In-process transport keeping one outbound channel per connection.
///
/// Each open connection owns an unbounded sender; the matching receiver is
/// handed to whatever task forwards frames onto the socket. A send to an
/// unregistered id, or to a channel whose receiver was dropped, reports
/// `Gone`, mirroring a managed gateway's behavior for dead connections.
#[derive(Debug, Default)]
pub struct LocalTransport {
    senders: Mutex<HashMap<String, UnboundedSender<WsMessage>>>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new connection: generates an id, registers its sender, and
    /// returns the id together with the receiving end.
    pub fn open(&self) -> (String, UnboundedReceiver<WsMessage>) {
        let connection_id = format!("conn-{}", Uuid::new_v4());
        let (sender, receiver) = mpsc::unbounded_channel();
        self.senders
            .lock()
            .unwrap()
            .insert(connection_id.clone(), sender);
        (connection_id, receiver)
    }

    /// Registers a sender under an externally assigned connection id.
    pub fn register(&self, connection_id: &str, sender: UnboundedSender<WsMessage>) {
        self.senders
            .lock()
            .unwrap()
            .insert(connection_id.to_string(), sender);
    }

    /// Drops a connection's sender. Subsequent sends report `Gone`.
    pub fn close(&self, connection_id: &str) {
        self.senders.lock().unwrap().remove(connection_id);
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn post_to_connection(
        &self,
        connection_id: &str,
        data: &str,
    ) -> Result<(), TransportError> {
        let senders = self.senders.lock().unwrap();

        let Some(sender) = senders.get(connection_id) else {
            return Err(TransportError::Gone);
        };

        sender
            .send(WsMessage::text(data))
            .map_err(|_| TransportError::Gone)
    }
}
