//! The `client` module defines the server-side representation of a client
//! holding an event stream open.
//!
//! It provides the `StreamClient` struct, which the streaming endpoint
//! registers with the hub for each connection. The client turns every
//! message it is handed into an event and queues it for that connection.

pub mod pubsub_client;
pub use pubsub_client::StreamClient;
