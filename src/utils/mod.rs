//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `wsgate` application.
//!
//! This module centralizes the error taxonomy and the tracing setup so the
//! rest of the crate can depend on one place for both.

pub mod error;
pub mod logging;
