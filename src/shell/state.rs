//! Shell session state: configuration, current server, listening registry.

use std::sync::Arc;

use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::Config;
use crate::error::ShellError;
use crate::listener::ListenerRegistry;
use crate::transport::{Connector, Transport};
use crate::Result;

/// The server the shell is currently connected to.
pub struct ActiveServer {
    /// Configured server name.
    pub name: String,
    /// Live transport for this server.
    pub transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ActiveServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveServer")
            .field("name", &self.name)
            .field("endpoint", &self.transport.endpoint())
            .finish()
    }
}

/// Mutable state carried across commands for one shell session.
///
/// Owns the listening registry for its whole lifetime; command handlers
/// receive the state by reference and never stash registry handles of
/// their own.
pub struct ShellState {
    config: Config,
    connector: Arc<dyn Connector>,
    current: Option<ActiveServer>,
    registry: ListenerRegistry,
    out: mpsc::UnboundedSender<String>,
}

impl ShellState {
    /// Create state with no server selected.
    pub fn new(
        config: Config,
        connector: Arc<dyn Connector>,
        out: mpsc::UnboundedSender<String>,
    ) -> Self {
        let registry = ListenerRegistry::new(out.clone());
        Self {
            config,
            connector,
            current: None,
            registry,
            out,
        }
    }

    /// Queue a line for the user.
    pub fn say(&self, line: impl Into<String>) {
        let _ = self.out.send(line.into());
    }

    /// The currently connected server, or `NoServerSelected`.
    pub fn current(&self) -> Result<&ActiveServer> {
        self.current.as_ref().ok_or(ShellError::NoServerSelected)
    }

    /// Listening session registry for this shell session.
    pub fn registry(&self) -> &ListenerRegistry {
        &self.registry
    }

    /// Configured server names, sorted.
    pub fn server_names(&self) -> Vec<String> {
        self.config.server_names()
    }

    /// Server the configuration asks to connect to at startup.
    pub fn default_server(&self) -> Option<String> {
        self.config.default_server.clone()
    }

    /// Prompt string reflecting the current server.
    pub fn prompt(&self) -> String {
        match self.current {
            Some(ref server) => format!("{}> ", server.name),
            None => "> ".to_string(),
        }
    }

    /// Select and connect to a configured server.
    ///
    /// Sessions never outlive the connection they subscribed on, so any
    /// active sessions are stopped before the switch.
    pub async fn use_server(&mut self, name: &str) -> Result<()> {
        let entry = self
            .config
            .server(name)
            .cloned()
            .ok_or_else(|| ShellError::UnknownServer(name.to_string()))?;

        self.registry.stop_all().await?;

        let transport = self.connector.connect(name, &entry).await?;
        info!(
            server = name,
            address = %entry.address(),
            endpoint = %transport.endpoint(),
            "connected"
        );
        self.current = Some(ActiveServer {
            name: name.to_string(),
            transport,
        });
        self.say(format!("{}", "Transport ready".green()));
        Ok(())
    }

    /// Tear down at shell exit: stop every session.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.registry.stop_all().await?;
        self.current = None;
        Ok(())
    }
}
