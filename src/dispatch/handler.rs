use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use crate::dispatch::event::{LifecycleEvent, Response, RouteKey};
use crate::notify::{Notification, Notifier};
use crate::store::{Connection, ConnectionStore};
use crate::utils::error::StorageError;

/// Routes an inbound lifecycle event to its side effects: store mutation
/// plus notification emission.
///
/// Every event yields a response. Any error raised while handling is
/// caught here, logged with context, and converted to a 500 response;
/// nothing propagates to the transport.
pub struct Dispatcher {
    store: Arc<dyn ConnectionStore>,
    notifier: Notifier,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn ConnectionStore>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    pub fn handle(&self, event: &Value) -> Response {
        let event = LifecycleEvent::from_value(event);

        info!(
            connection_id = %event.connection_id,
            route_key = %event.raw_route_key,
            "lifecycle event received"
        );

        let result = match &event.route_key {
            RouteKey::Connect => self.on_connect(&event),
            RouteKey::Disconnect => self.on_disconnect(&event),
            RouteKey::Default => self.on_default(&event),
            RouteKey::Custom(route) => self.on_custom(&event, route),
        };

        match result {
            Ok(response) => response,
            Err(err) => {
                error!(
                    connection_id = %event.connection_id,
                    route_key = %event.raw_route_key,
                    error = %err,
                    "lifecycle handler failed"
                );
                Response::internal_error()
            }
        }
    }

    /// `$connect`: create or refresh the connection record.
    fn on_connect(&self, event: &LifecycleEvent) -> Result<Response, StorageError> {
        let record = Connection::new(&event.connection_id, &event.raw_route_key, event.user_id);
        self.store.put(&record)?;

        self.notifier.emit(Notification::Connected {
            connection_id: event.connection_id.clone(),
        });

        Ok(Response::ok("Connected"))
    }

    /// `$disconnect`: remove the connection record.
    fn on_disconnect(&self, event: &LifecycleEvent) -> Result<Response, StorageError> {
        self.store.remove(&event.connection_id)?;

        self.notifier.emit(Notification::Disconnected {
            connection_id: event.connection_id.clone(),
        });

        Ok(Response::ok("Disconnected"))
    }

    /// `$default`: surface the message payload to consumers.
    fn on_default(&self, event: &LifecycleEvent) -> Result<Response, StorageError> {
        self.notifier.emit(Notification::Message {
            connection_id: event.connection_id.clone(),
            payload: event.parsed_body(),
        });

        Ok(Response::ok("Message received"))
    }

    /// Any other route key: surface the payload under the literal route.
    fn on_custom(&self, event: &LifecycleEvent, route: &str) -> Result<Response, StorageError> {
        self.notifier.emit(Notification::Custom {
            route: route.to_string(),
            connection_id: event.connection_id.clone(),
            payload: event.parsed_body(),
        });

        Ok(Response::ok("Custom route handled"))
    }
}
