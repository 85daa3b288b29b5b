//! Per-session view of the shared inbound feed.

use tokio::sync::broadcast;
use tracing::warn;

use super::Message;

/// One receiver's view of the transport's inbound message feed.
///
/// Every listening session holds its own `Feed`, so a slow session only
/// loses its own messages when it falls behind. `next` is cancel safe: a
/// message is consumed only when it is returned.
pub struct Feed {
    inner: broadcast::Receiver<Message>,
}

impl Feed {
    pub(crate) fn new(inner: broadcast::Receiver<Message>) -> Self {
        Self { inner }
    }

    /// Wait for the next message, or `None` once the feed is closed.
    ///
    /// Lagged gaps are logged and skipped rather than surfaced as errors;
    /// the session keeps running on the messages that remain.
    pub async fn next(&mut self) -> Option<Message> {
        loop {
            match self.inner.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "feed view lagged; messages were dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
