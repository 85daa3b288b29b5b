//! # pubsub-shell
//!
//! Interactive command shell for pub/sub messaging servers.
//!
//! The core of the crate is the listening session registry: one background
//! task per subscribed channel, forwarding matching messages from the
//! transport's shared inbound feed to the shell output, with clean start and
//! stop semantics (no leaked tasks, no lost messages, no double shutdown).
//!
//! ## Features
//!
//! - **Listening sessions**: one cancellable task per subscribed channel
//! - **Transport trait**: servers are reached through a pluggable transport;
//!   an in-process loopback implementation ships with the crate
//! - **Interactive shell**: rustyline REPL with history, where incoming
//!   messages print above the prompt instead of tearing it
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pubsub_shell::{ListenerRegistry, MemoryTransport, Transport};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> pubsub_shell::Result<()> {
//!     pubsub_shell::logging::try_init("warn").ok();
//!
//!     let (out_tx, mut out_rx) = mpsc::unbounded_channel();
//!     let registry = ListenerRegistry::new(out_tx);
//!
//!     let transport: Arc<dyn Transport> = Arc::new(MemoryTransport::new("local"));
//!     registry.listen(transport.clone(), "news").await?;
//!     transport.publish("news", "hello".into()).await?;
//!
//!     if let Some(line) = out_rx.recv().await {
//!         println!("{line}");
//!     }
//!
//!     registry.stop_all().await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod listener;
pub mod logging;
pub mod shell;
pub mod transport;

// Re-export commonly used types
pub use config::{Config, ServerEntry};
pub use error::{Result, ShellError};
pub use listener::{ListenerRegistry, Session};
pub use transport::{
    Connector, Feed, MemoryConnector, MemoryTransport, Message, NodeStats, Transport,
    TransportError,
};
