//! The `channel` module maintains channel membership on top of the
//! connection store.
//!
//! A channel is a named broadcast group. Connections join and leave
//! channels to receive channel-scoped fan-out; the index keeps the
//! connection record and the channel member list in step.

pub mod index;

pub use index::ChannelIndex;
