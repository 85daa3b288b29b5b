//! Inbound message type.

use bytes::Bytes;

/// A single message delivered on the shared inbound feed.
///
/// Payloads are raw bytes, forwarded verbatim; the shell renders them as
/// (lossy) UTF-8 when printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Channel the message was published to.
    pub channel: String,
    /// Raw payload bytes.
    pub payload: Bytes,
}

impl Message {
    /// Create a new message.
    pub fn new(channel: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
        }
    }

    /// Payload rendered as text for display.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// The line a listening session prints for this message.
    pub fn display_line(&self) -> String {
        format!("-> {} : {}", self.channel, self.payload_text())
    }
}
