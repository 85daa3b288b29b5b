//! Registry of active listening sessions, keyed by channel.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::Session;
use crate::error::ShellError;
use crate::transport::Transport;
use crate::Result;

/// Thread-safe registry of listening sessions.
///
/// At most one session exists per channel. Sessions never touch the registry
/// themselves; every insert and remove happens through these methods, so a
/// session can be stopped exactly once even under concurrent callers.
pub struct ListenerRegistry {
    sessions: RwLock<HashMap<String, Session>>,
    out: mpsc::UnboundedSender<String>,
}

impl ListenerRegistry {
    /// Create an empty registry that forwards listener output to `out`.
    pub fn new(out: mpsc::UnboundedSender<String>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            out,
        }
    }

    /// Start listening on `channel` over `transport`.
    ///
    /// The feed view is taken before subscribing, so messages delivered
    /// right after the subscribe ack cannot fall into a gap. The session
    /// task is spawned only once it owns its map slot; a listen that loses
    /// a race to a concurrent caller never has a task that could emit.
    pub async fn listen(&self, transport: Arc<dyn Transport>, channel: &str) -> Result<()> {
        if self.is_listening(channel)? {
            return Err(ShellError::AlreadyListening(channel.to_string()));
        }

        let feed = transport.feed();
        transport
            .subscribe(channel)
            .await
            .map_err(|source| ShellError::Subscription {
                channel: channel.to_string(),
                source,
            })?;

        let mut sessions = self.sessions.write().map_err(|_| ShellError::LockPoisoned)?;
        match sessions.entry(channel.to_string()) {
            // Lost a race with a concurrent listen; the existing session
            // stays, and the unread feed view is simply dropped.
            Entry::Occupied(_) => Err(ShellError::AlreadyListening(channel.to_string())),
            Entry::Vacant(slot) => {
                // Spawn is synchronous; the lock is not held across an await.
                slot.insert(Session::spawn(
                    channel.to_string(),
                    transport,
                    feed,
                    self.out.clone(),
                ));
                debug!(channel, "listening session registered");
                Ok(())
            }
        }
    }

    /// Stop the session for `channel`.
    ///
    /// Removing the session from the map first claims it for this caller;
    /// a racing stop finds the channel gone and reports `NotListening`.
    /// The task is cancelled without being awaited, so stop returns as soon
    /// as the server-side unsubscribe completes.
    pub async fn stop(&self, channel: &str) -> Result<()> {
        let session = {
            let mut sessions = self.sessions.write().map_err(|_| ShellError::LockPoisoned)?;
            sessions
                .remove(channel)
                .ok_or_else(|| ShellError::NotListening(channel.to_string()))?
        };

        if let Err(err) = session.transport().unsubscribe(channel).await {
            warn!(channel, error = %err, "unsubscribe failed; session removed anyway");
        }
        session.cancel();
        debug!(channel, "listening session stopped");
        Ok(())
    }

    /// Stop every session and wait for all of their tasks to finish.
    ///
    /// Used on exit and when switching servers. Skips server-side
    /// unsubscribes; the connection is going away with the sessions.
    pub async fn stop_all(&self) -> Result<()> {
        let sessions: Vec<Session> = {
            let mut map = self.sessions.write().map_err(|_| ShellError::LockPoisoned)?;
            map.drain().map(|(_, session)| session).collect()
        };

        if sessions.is_empty() {
            return Ok(());
        }

        debug!(count = sessions.len(), "stopping all listening sessions");
        for session in &sessions {
            session.cancel();
        }
        for session in sessions {
            session.join().await;
        }
        Ok(())
    }

    /// Channels with an active session, sorted.
    pub fn active(&self) -> Result<Vec<String>> {
        let sessions = self.sessions.read().map_err(|_| ShellError::LockPoisoned)?;
        let mut channels: Vec<String> = sessions.keys().cloned().collect();
        channels.sort();
        Ok(channels)
    }

    /// Whether a session exists for `channel`.
    pub fn is_listening(&self, channel: &str) -> Result<bool> {
        let sessions = self.sessions.read().map_err(|_| ShellError::LockPoisoned)?;
        Ok(sessions.contains_key(channel))
    }

    /// Number of active sessions.
    pub fn count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }
}
