//! Event-stream framing.
//!
//! Every message becomes one event built with axum's [`Event`]: one `data: `
//! line per line of the payload, terminated by a blank line. A single-line
//! payload is therefore exactly `data: <text>\n\n` on the wire.
//!
//! Wire difference for multi-line payloads: the text is not written raw.
//! Each `\n`, `\r\n` or `\r` inside it starts a further `data: ` line, so
//! `"a\n\nb"` goes out as `data: a\ndata: \ndata: b\n\n`. Event-stream
//! clients join those lines back into the original text, and a payload can
//! never end its event early or bleed into the next one.

use std::borrow::Cow;

use axum::response::sse::Event;

/// Builds the event carrying `payload`.
///
/// Carriage returns are folded into `\n` first; `Event::data` rejects them.
pub fn event(payload: &str) -> Event {
    let normalized = if payload.contains('\r') {
        Cow::Owned(payload.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(payload)
    };

    Event::default().data(normalized)
}

/// Reassembles event payloads from a byte stream split at arbitrary points.
///
/// Understands the subset of the event-stream format this server emits:
/// `data` fields joined by `\n`, comment lines skipped, other fields ignored.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns the payloads of every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(end) = self.buf.windows(2).position(|w| w == b"\n\n") {
            let block: Vec<u8> = self.buf.drain(..end + 2).collect();
            if let Some(payload) = Self::parse_block(&block[..end]) {
                events.push(payload);
            }
        }
        events
    }

    fn parse_block(block: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(block);
        let mut data: Option<String> = None;

        for line in text.split('\n') {
            if line.starts_with(':') {
                continue;
            }
            let Some(value) = line.strip_prefix("data") else {
                continue;
            };
            let value = match value.strip_prefix(':') {
                Some(v) => v.strip_prefix(' ').unwrap_or(v),
                None if value.is_empty() => "",
                None => continue,
            };
            match data.as_mut() {
                Some(d) => {
                    d.push('\n');
                    d.push_str(value);
                }
                None => data = Some(value.to_string()),
            }
        }
        data
    }
}
