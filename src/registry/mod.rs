//! The `registry` module exposes the whole connection registry behind one
//! facade.
//!
//! External callers hold an explicit [`Registry`] reference built by
//! constructor injection; there is no global accessor. The facade wires
//! the store, channel index, dispatcher, and fan-out together.

pub mod facade;

pub use facade::{Registry, Stats};

#[cfg(test)]
mod tests;
