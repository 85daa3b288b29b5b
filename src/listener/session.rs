//! A single channel listening session.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::transport::{Feed, Transport};

/// A running listener for one channel.
///
/// The session owns a background task that reads the transport feed and
/// forwards lines for its channel to the shell output. Cancellation is
/// cooperative and idempotent: any number of `cancel` calls request the same
/// single shutdown, and the task checks the token before each message.
pub struct Session {
    channel: String,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    transport: Arc<dyn Transport>,
}

impl Session {
    /// Spawn the background task for `channel` and return its handle.
    pub(crate) fn spawn(
        channel: String,
        transport: Arc<dyn Transport>,
        mut feed: Feed,
        out: mpsc::UnboundedSender<String>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let name = channel.clone();

        let task = tokio::spawn(async move {
            debug!(channel = %name, "listening session started");
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    next = feed.next() => match next {
                        Some(msg) if msg.channel == name => {
                            if out.send(msg.display_line()).is_err() {
                                // Output side is gone; nothing left to do.
                                break;
                            }
                        }
                        Some(_) => {}
                        None => {
                            debug!(channel = %name, "feed closed; session ending");
                            break;
                        }
                    },
                }
            }
            debug!(channel = %name, "listening session ended");
        });

        Self {
            channel,
            cancel,
            task,
            transport,
        }
    }

    /// Transport the session was started on.
    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Request shutdown of the background task.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the background task to finish.
    pub(crate) async fn join(self) {
        let _ = self.task.await;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("channel", &self.channel)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
