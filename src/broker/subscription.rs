use std::sync::Weak;

use crate::broker::engine::HubInner;
use crate::broker::subscriber::SubscriberId;

/// A live registration with a [`Hub`](crate::broker::Hub).
///
/// Releasing the subscription, either with [`cancel`](Subscription::cancel) or
/// by dropping it, removes the subscriber. Release happens exactly once on every
/// path, and is a no-op if the hub has already been dropped.
#[must_use = "dropping a Subscription immediately unsubscribes"]
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    hub: Weak<HubInner>,
    released: bool,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, hub: Weak<HubInner>) -> Self {
        Self {
            id,
            hub,
            released: false,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Deregisters now. Returns `false` if the subscriber had already been
    /// removed, for example after a failed delivery.
    pub fn cancel(mut self) -> bool {
        self.release()
    }

    fn release(&mut self) -> bool {
        if std::mem::replace(&mut self.released, true) {
            return false;
        }
        match self.hub.upgrade() {
            Some(hub) => hub.remove(self.id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
