//! # ChatCast
//!
//! `chatcast` is a minimal HTTP chat relay. Messages submitted on one short-lived
//! request are broadcast, in real time, to every client holding a long-lived
//! Server-Sent Events stream open.
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `broker`: The in-memory broadcast hub that owns the subscriber registry and fans messages out.
//! - `client`: The connection-backed subscriber registered for each open event stream.
//! - `config`: Handles loading and managing server configuration.
//! - `transport`: The HTTP router, the streaming and submission endpoints, and the event-stream framing.
//! - `utils`: Contains shared utilities, such as error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod transport;
pub mod utils;
