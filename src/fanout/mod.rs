//! The `fanout` module delivers outbound payloads to connections through
//! the transport.
//!
//! Delivery is best-effort and at-most-once: callers get a per-recipient
//! success map, never an all-or-nothing error, and failed sends are not
//! retried. Connections the transport reports as gone are pruned from the
//! store as a side effect.

pub mod sender;

pub use sender::Fanout;

#[cfg(test)]
mod tests;
