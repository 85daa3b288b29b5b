//! Configuration management for the pub/sub shell.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Args;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Named servers the shell can connect to.
    pub servers: BTreeMap<String, ServerEntry>,
    /// Server to connect to at startup, if any.
    pub default_server: Option<String>,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// One server entry from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEntry {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// API key for commands that require one.
    pub key: Option<String>,
}

impl ServerEntry {
    /// The `host:port` address of this server.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerEntry {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            key: None,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            // The shell shares the terminal with its own output; keep
            // logging quiet unless asked for more.
            level: "warn".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut servers = BTreeMap::new();
        servers.insert("local".to_string(), ServerEntry::default());
        Self {
            servers,
            default_server: None,
            logging: LoggingSection::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Default config file location, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pubsub-shell").join("config.json"))
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(server) = std::env::var("PUBSUB_SHELL_SERVER") {
            if !server.is_empty() {
                self.default_server = Some(server);
            }
        }

        if let Ok(level) = std::env::var("PUBSUB_SHELL_LOG") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref server) = args.server {
            self.default_server = Some(server.clone());
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        // An explicitly named config file must load; the default location
        // is only used when it exists.
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Config::from_file(&path)?,
                _ => Config::default(),
            },
        };

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Look up a server entry by name.
    pub fn server(&self, name: &str) -> Option<&ServerEntry> {
        self.servers.get(name)
    }

    /// All configured server names, sorted.
    pub fn server_names(&self) -> Vec<String> {
        self.servers.keys().cloned().collect()
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
