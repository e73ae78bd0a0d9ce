use axum::response::sse::Event;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::TrySendError;

use crate::broker::{Message, Subscriber};
use crate::transport::frame;
use crate::utils::DeliveryError;

/// A connected event-stream client in the chat system.
///
/// The client owns the sending half of a bounded event queue; the receiving
/// half feeds that connection's response body. Delivery never waits: a closed
/// queue means the connection is gone, a full one means the peer stopped
/// reading.
#[derive(Debug)]
pub struct StreamClient {
    /// Unique identifier for the connection, used in logs.
    pub id: String,

    /// Queue of events for the connection.
    sender: Sender<Event>,
}

impl StreamClient {
    pub fn new(sender: Sender<Event>) -> Self {
        Self {
            id: format!("client-{}", uuid::Uuid::new_v4()),
            sender,
        }
    }
}

impl Subscriber for StreamClient {
    fn deliver(&self, message: &Message) -> Result<(), DeliveryError> {
        self.sender
            .try_send(frame::event(message.payload()))
            .map_err(|e| match e {
                TrySendError::Full(_) => DeliveryError::Lagged {
                    capacity: self.sender.max_capacity(),
                },
                TrySendError::Closed(_) => DeliveryError::Closed,
            })
    }
}
