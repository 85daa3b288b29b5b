//! Transport layer: the connection to a pub/sub server.
//!
//! The shell talks to servers only through the [`Transport`] trait, so the
//! listener registry and command layer never depend on a concrete backend.
//! All inbound messages arrive on a single broadcast feed; each listening
//! session takes its own [`Feed`] view of it.

mod feed;
mod memory;
mod message;

pub use feed::Feed;
pub use memory::{MemoryConnector, MemoryTransport};
pub use message::Message;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::config::ServerEntry;

/// Errors surfaced by a transport backend.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection closed")]
    ConnectionClosed,

    #[error("{0}")]
    Backend(String),
}

/// Metrics snapshot for one server node.
#[derive(Debug, Clone)]
pub struct NodeStats {
    /// Node name as reported by the server.
    pub name: String,
    /// Metric values keyed by metric name, sorted for stable output.
    pub metrics: BTreeMap<String, i64>,
}

/// A live connection to a pub/sub server.
///
/// `subscribe` and `unsubscribe` manage server-side channel interest;
/// delivery happens on the shared feed regardless of which call registered
/// the interest.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Register interest in a channel. Messages published to it afterwards
    /// appear on the feed.
    async fn subscribe(&self, channel: &str) -> Result<(), TransportError>;

    /// Drop interest in a channel.
    async fn unsubscribe(&self, channel: &str) -> Result<(), TransportError>;

    /// Publish a payload to a channel.
    async fn publish(&self, channel: &str, payload: Bytes) -> Result<(), TransportError>;

    /// Take a new view of the inbound message feed.
    ///
    /// Views taken before a `subscribe` observe every message delivered for
    /// it; views taken later start from the current position.
    fn feed(&self) -> Feed;

    /// Channels currently active on the server, sorted.
    async fn channels(&self) -> Result<Vec<String>, TransportError>;

    /// Metrics for every known server node.
    async fn stats(&self) -> Result<Vec<NodeStats>, TransportError>;

    /// Human-readable endpoint of this connection.
    fn endpoint(&self) -> String;
}

/// Factory that turns a configured server entry into a live transport.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        name: &str,
        server: &ServerEntry,
    ) -> Result<Arc<dyn Transport>, TransportError>;
}
