//! In-process loopback transport.
//!
//! Backs the shell when no real server is involved: publishes loop straight
//! back onto the inbound feed, gated by the subscribed-channel set the same
//! way a server only pushes channels the client subscribed to. Also the
//! workhorse for tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::broadcast;

use super::{Connector, Feed, Message, NodeStats, Transport, TransportError};
use crate::config::ServerEntry;

const DEFAULT_FEED_CAPACITY: usize = 256;

pub struct MemoryTransport {
    name: String,
    /// Feed sender; `None` once the transport is closed.
    feed_tx: Mutex<Option<broadcast::Sender<Message>>>,
    subscribed: Mutex<BTreeSet<String>>,
    published: AtomicU64,
    dropped: AtomicU64,
    started: Instant,
}

// A poisoned lock still holds valid data for this transport.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl MemoryTransport {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_FEED_CAPACITY)
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self {
            name: name.into(),
            feed_tx: Mutex::new(Some(tx)),
            subscribed: Mutex::new(BTreeSet::new()),
            published: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Close the transport. Existing feed views run dry, subsequent calls
    /// fail with [`TransportError::ConnectionClosed`].
    pub fn close(&self) {
        lock(&self.feed_tx).take();
    }

    fn sender(&self) -> Result<broadcast::Sender<Message>, TransportError> {
        lock(&self.feed_tx)
            .as_ref()
            .cloned()
            .ok_or(TransportError::ConnectionClosed)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn subscribe(&self, channel: &str) -> Result<(), TransportError> {
        self.sender()?;
        lock(&self.subscribed).insert(channel.to_string());
        Ok(())
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), TransportError> {
        self.sender()?;
        lock(&self.subscribed).remove(channel);
        Ok(())
    }

    async fn publish(&self, channel: &str, payload: Bytes) -> Result<(), TransportError> {
        let tx = self.sender()?;
        self.published.fetch_add(1, Ordering::Relaxed);
        if lock(&self.subscribed).contains(channel) {
            // A send error means no live feed view; the message is dropped.
            if tx.send(Message::new(channel, payload)).is_err() {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    fn feed(&self) -> Feed {
        match lock(&self.feed_tx).as_ref() {
            Some(tx) => Feed::new(tx.subscribe()),
            None => {
                // Already closed: hand out a view that is immediately dry.
                let (tx, rx) = broadcast::channel(1);
                drop(tx);
                Feed::new(rx)
            }
        }
    }

    async fn channels(&self) -> Result<Vec<String>, TransportError> {
        self.sender()?;
        Ok(lock(&self.subscribed).iter().cloned().collect())
    }

    async fn stats(&self) -> Result<Vec<NodeStats>, TransportError> {
        self.sender()?;
        let mut metrics = BTreeMap::new();
        metrics.insert(
            "node_num_channels".to_string(),
            lock(&self.subscribed).len() as i64,
        );
        metrics.insert("node_num_clients".to_string(), 1);
        metrics.insert(
            "node_num_msg_published".to_string(),
            self.published.load(Ordering::Relaxed) as i64,
        );
        metrics.insert(
            "node_num_msg_dropped".to_string(),
            self.dropped.load(Ordering::Relaxed) as i64,
        );
        metrics.insert(
            "node_uptime_seconds".to_string(),
            self.started.elapsed().as_secs() as i64,
        );
        Ok(vec![NodeStats {
            name: self.name.clone(),
            metrics,
        }])
    }

    fn endpoint(&self) -> String {
        format!("memory://{}", self.name)
    }
}

/// Connector that hands out a fresh in-process transport per server.
pub struct MemoryConnector;

#[async_trait]
impl Connector for MemoryConnector {
    async fn connect(
        &self,
        name: &str,
        _server: &ServerEntry,
    ) -> Result<Arc<dyn Transport>, TransportError> {
        Ok(Arc::new(MemoryTransport::new(name)))
    }
}
