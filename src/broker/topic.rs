use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};

use crate::broker::message::Message;
use crate::broker::subscriber::{Subscriber, SubscriberId};
use crate::utils::DeliveryError;

/// Outcome of offering one message to one registration.
#[derive(Debug)]
pub(crate) enum Delivery {
    Delivered,
    /// The registration was removed before its turn came.
    Skipped,
    Failed(DeliveryError),
    Panicked,
}

/// One subscriber as held by the registry.
///
/// The `active` lock is held for the whole of a `deliver` call and taken again
/// on removal, so once removal returns the subscriber is never invoked again.
pub(crate) struct Registration {
    pub(crate) id: SubscriberId,
    subscriber: Box<dyn Subscriber>,
    active: Mutex<bool>,
}

impl Registration {
    fn new(id: SubscriberId, subscriber: Box<dyn Subscriber>) -> Self {
        Self {
            id,
            subscriber,
            active: Mutex::new(true),
        }
    }

    pub(crate) fn deliver(&self, message: &Message) -> Delivery {
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !*active {
            return Delivery::Skipped;
        }

        match catch_unwind(AssertUnwindSafe(|| self.subscriber.deliver(message))) {
            Ok(Ok(())) => Delivery::Delivered,
            Ok(Err(e)) => Delivery::Failed(e),
            Err(_) => Delivery::Panicked,
        }
    }

    /// Marks the registration inactive, blocking until any in-flight delivery
    /// to it has finished.
    pub(crate) fn retire(&self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        *active = false;
    }
}

/// The chat topic: its name and the ordered set of live registrations.
///
/// Keys are monotonically increasing, so iteration order is registration order.
pub struct Topic {
    pub name: String,
    subscribers: BTreeMap<SubscriberId, Arc<Registration>>,
}

impl Topic {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: BTreeMap::new(),
        }
    }

    pub(crate) fn subscribe(&mut self, id: SubscriberId, subscriber: Box<dyn Subscriber>) {
        self.subscribers
            .insert(id, Arc::new(Registration::new(id, subscriber)));
    }

    /// Detaches a registration. The caller must `retire` it once the topic
    /// lock has been released.
    pub(crate) fn unsubscribe(&mut self, id: SubscriberId) -> Option<Arc<Registration>> {
        self.subscribers.remove(&id)
    }

    /// The registrations present right now, in fan-out order.
    pub(crate) fn snapshot(&self) -> Vec<Arc<Registration>> {
        self.subscribers.values().cloned().collect()
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
