/// A chat message travelling through the hub.
///
/// The payload is opaque text: any string, including the empty one, is a
/// valid message. The timestamp records when the message entered the system
/// (Unix milliseconds) and is used for logging only.
///
/// Messages are immutable once built; subscribers only ever see `&Message`.
///
/// # Example
///
/// ```rust
/// use chatcast::broker::Message;
///
/// let msg = Message::new("hello");
/// assert_eq!(msg.payload(), "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    payload: String,
    timestamp: i64,
}

impl Message {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl From<String> for Message {
    fn from(payload: String) -> Self {
        Self::new(payload)
    }
}

impl From<&str> for Message {
    fn from(payload: &str) -> Self {
        Self::new(payload)
    }
}
