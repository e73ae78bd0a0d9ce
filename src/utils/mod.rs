//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `chatcast` application.
//!
//! This module centralizes reusable components, such as the error types and
//! the logging setup shared by the server and the command-line client.

pub mod error;
pub mod logging;

pub use error::{DeliveryError, Error, Result};
