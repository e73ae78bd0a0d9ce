//! Hub engine
//!
//! This module contains the in-memory broadcast hub responsible for:
//! - keeping the ordered set of subscribers for the chat topic
//! - fanning each published message out to a snapshot of that set
//! - isolating subscribers from one another's failures
//!
//! Concurrency and usage notes:
//! - `Hub` is a cheap handle; clone it into every place that needs it. There is
//!   no process-wide instance.
//! - `publish` is synchronous and never awaits. Subscribers are expected to
//!   hand messages off without blocking (see [`Subscriber`]).
//! - Concurrent `publish` calls are serialised, so every subscriber observes
//!   the same global order.
//! - Subscribers that fail or panic are deregistered once the fan-out pass
//!   that observed the failure completes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, warn};

use crate::broker::message::Message;
use crate::broker::subscriber::{Subscriber, SubscriberId};
use crate::broker::subscription::Subscription;
use crate::broker::topic::{Delivery, Topic};

/// Name of the only topic the hub carries.
pub const CHAT_TOPIC: &str = "chat";

pub(crate) struct HubInner {
    topic: Mutex<Topic>,
    /// Held for the duration of one fan-out pass.
    fanout: Mutex<()>,
    next_id: AtomicU64,
}

impl HubInner {
    fn topic(&self) -> std::sync::MutexGuard<'_, Topic> {
        self.topic.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn remove(&self, id: SubscriberId) -> bool {
        // Detach under the topic lock, retire outside it: retiring may wait for
        // an in-flight delivery, and that delivery may itself touch the topic.
        let removed = self.topic().unsubscribe(id);
        match removed {
            Some(registration) => {
                registration.retire();
                true
            }
            None => false,
        }
    }
}

/// The broadcast hub.
///
/// `Hub` decouples message producers from message consumers within one process.
/// Cloning a `Hub` yields another handle to the same registry.
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

impl Hub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                topic: Mutex::new(Topic::new(CHAT_TOPIC)),
                fanout: Mutex::new(()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Registers `subscriber` for every subsequent `publish`.
    ///
    /// The returned [`Subscription`] deregisters it when cancelled or dropped.
    pub fn subscribe<S>(&self, subscriber: S) -> Subscription
    where
        S: Subscriber + 'static,
    {
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let count = {
            let mut topic = self.inner.topic();
            topic.subscribe(id, Box::new(subscriber));
            topic.len()
        };
        debug!(subscriber = %id, subscribers = count, "Subscribed");
        Subscription::new(id, Arc::downgrade(&self.inner))
    }

    /// Removes the subscriber with `id` if it is still registered.
    ///
    /// Idempotent: returns `false` and does nothing when it is already gone.
    /// Once this returns the subscriber will not be invoked again.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.inner.remove(id);
        if removed {
            debug!(subscriber = %id, "Unsubscribed");
        }
        removed
    }

    /// Delivers `message` to every subscriber registered when the call began,
    /// in registration order. Returns how many accepted it.
    ///
    /// Subscribers added during the pass do not receive this message.
    /// Subscribers removed during the pass are skipped from the point their
    /// removal is observed. A failing or panicking subscriber is dropped from
    /// the registry and never prevents delivery to the rest.
    ///
    /// # Deadlocks
    ///
    /// Publishes are serialised. Calling `publish` from inside a subscriber's
    /// `deliver` on the same hub blocks forever, as does unsubscribing that
    /// same subscriber from inside its own `deliver`.
    pub fn publish(&self, message: Message) -> usize {
        let _order = self
            .inner
            .fanout
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let snapshot = self.inner.topic().snapshot();
        if snapshot.is_empty() {
            debug!(timestamp = message.timestamp(), "Published with no subscribers");
            return 0;
        }

        let mut delivered = 0;
        let mut failed = Vec::new();

        for registration in &snapshot {
            match registration.deliver(&message) {
                Delivery::Delivered => delivered += 1,
                Delivery::Skipped => {}
                Delivery::Failed(e) => {
                    warn!(subscriber = %registration.id, "Delivery failed, dropping subscriber: {e}");
                    failed.push(registration.id);
                }
                Delivery::Panicked => {
                    error!(subscriber = %registration.id, "Subscriber panicked during delivery, dropping it");
                    failed.push(registration.id);
                }
            }
        }

        // Release our references before removal so dropped subscribers free
        // their resources (and close their connections) promptly.
        drop(snapshot);
        for id in failed {
            self.inner.remove(id);
        }

        debug!(
            timestamp = message.timestamp(),
            delivered, "Published message"
        );
        delivered
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.topic().len()
    }

    pub fn is_subscribed(&self, id: SubscriberId) -> bool {
        self.inner.topic().contains(id)
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Hub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
