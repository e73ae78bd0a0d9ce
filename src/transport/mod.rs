//! The `transport` module is responsible for handling network communication
//! with clients over HTTP.
//!
//! It defines the event-stream wire framing, the request and response types of
//! the plain endpoints, and the HTTP server itself: the streaming delivery
//! endpoint that registers one subscriber per open connection, and the
//! submission endpoint that publishes to the hub.

pub mod frame;
pub mod http;
pub mod message;
pub mod routes;
pub mod sse;

pub use http::{AppState, bind, router, serve, start_http_server};
