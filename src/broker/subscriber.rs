use std::fmt;

use crate::broker::message::Message;
use crate::utils::DeliveryError;

/// Opaque identity of one registration with a [`Hub`](crate::broker::Hub).
///
/// Ids are handed out in increasing order, which is also the fan-out order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(pub(crate) u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Anything that can receive published messages.
///
/// `deliver` is called synchronously from inside the hub's fan-out loop, so it
/// must not block: hand the message off (for example into a channel) and
/// return. Returning an error deregisters the subscriber.
///
/// Implementations must not call `publish` on the same hub, nor remove
/// themselves from it, while inside `deliver`. Return an error instead.
pub trait Subscriber: Send + Sync {
    fn deliver(&self, message: &Message) -> Result<(), DeliveryError>;
}

impl<F> Subscriber for F
where
    F: Fn(&Message) -> Result<(), DeliveryError> + Send + Sync,
{
    fn deliver(&self, message: &Message) -> Result<(), DeliveryError> {
        self(message)
    }
}
