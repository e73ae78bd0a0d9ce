//! The `error` module defines the error types used within the `chatcast` application.
//!
//! Delivery failures are contained at the subscriber boundary and never reach a
//! publisher. Everything else is a process-level failure surfaced to `main`.

use thiserror::Error;

/// Reasons a subscriber could not accept a message.
///
/// The hub treats any of these as an implicit disconnect and deregisters the
/// subscriber.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("subscriber connection is closed")]
    Closed,

    #[error("subscriber fell behind, buffer of {capacity} frames is full")]
    Lagged { capacity: usize },
}

/// Process-level failures: startup, serving, and the command-line client.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
