//! The `dispatch` module turns inbound lifecycle events into registry side
//! effects.
//!
//! It defines the event and response wire shapes consumed and produced at
//! the gateway boundary, and the [`Dispatcher`] that routes `$connect`,
//! `$disconnect`, `$default`, and custom route keys.

pub mod event;
pub mod handler;

pub use event::{LifecycleEvent, Response, RouteKey};
pub use handler::Dispatcher;
