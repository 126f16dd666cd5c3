//! # wsgate
//!
//! `wsgate` is the connection registry and message fan-out core for a
//! serverless WebSocket gateway. It tracks which client connections are
//! open, which channels and users each connection belongs to, and delivers
//! outbound payloads to one, many, or all connections while pruning
//! connections the transport reports as gone.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `store`: Key-value persistence of connection records, the global connection set, and channel member lists, with TTL-based expiry.
//! - `channel`: Bidirectional mapping between channels and connection ids on top of the store.
//! - `dispatch`: Routes inbound lifecycle events (connect/disconnect/message/custom) to store mutations and notifications.
//! - `fanout`: Best-effort delivery of payloads through the transport, with per-recipient outcomes and gone-connection pruning.
//! - `registry`: The facade aggregating the read and write API for external callers.
//! - `transport`: The outbound push seam and its in-process implementation.
//! - `notify`: The notification channel carrying registry side effects to application code.
//! - `config`: Handles loading and managing configuration.
//! - `utils`: Shared utilities: the error taxonomy and logging setup.

pub mod channel;
pub mod config;
pub mod dispatch;
pub mod fanout;
pub mod notify;
pub mod registry;
pub mod store;
pub mod transport;
pub mod utils;
