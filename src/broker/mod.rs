//! The `broker` module is the in-memory broadcast hub.
//!
//! It owns the single chat topic's subscriber registry and bridges short-lived
//! publishers to long-lived subscribers. It performs no I/O of its own.

pub mod engine;
pub mod message;
pub mod subscriber;
pub mod subscription;
pub mod topic;

pub use engine::Hub;
pub use message::Message;
pub use subscriber::{Subscriber, SubscriberId};
pub use subscription::Subscription;

#[cfg(test)]
mod tests;
