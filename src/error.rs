//! Error types for pubsub-shell.

use thiserror::Error;

use crate::transport::TransportError;

/// Main error type for shell operations.
///
/// None of these are fatal to the process: every variant is reported to the
/// user and the shell keeps accepting commands.
#[derive(Error, Debug)]
pub enum ShellError {
    /// No server connection is active.
    #[error("No server selected: try the use command: use server1")]
    NoServerSelected,

    /// The requested server name is not in the configuration file.
    #[error("Server {0} not found: please check your config file")]
    UnknownServer(String),

    /// Stop requested for a channel with no active listening session.
    #[error("Not listening to channel {0}")]
    NotListening(String),

    /// Listen requested for a channel that already has a session.
    #[error("Already listening to channel {0}")]
    AlreadyListening(String),

    /// Subscribing to a channel failed on the transport.
    #[error("subscribing to channel {channel} failed: {source}")]
    Subscription {
        channel: String,
        source: TransportError,
    },

    /// Transport-level failure outside subscribe (publish, stats, connect).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Invalid command usage; carries the example text shown to the user.
    #[error("{0}")]
    Usage(&'static str),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line editor error.
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// A background task panicked or was aborted.
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

/// Convenience Result type for pubsub-shell operations.
pub type Result<T> = std::result::Result<T, ShellError>;
