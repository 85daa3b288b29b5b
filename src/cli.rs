//! Command-line interface for the pub/sub shell.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Server to connect to at startup (overrides config).
    pub server: Option<String>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("server") => {
                result.server = Some(parser.value()?.parse()?);
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"pubsub-shell {version}
Interactive shell for pub/sub messaging servers

USAGE:
    pubsub-shell [OPTIONS]

OPTIONS:
    -c, --config <FILE>     Path to configuration file (JSON)
    -s, --server <NAME>     Server to connect to at startup
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    PUBSUB_SHELL_SERVER     Server to connect to at startup (overrides config)
    PUBSUB_SHELL_LOG        Log level (overrides config)
    RUST_LOG                Alternative log level setting

EXAMPLES:
    # Start with the default config file
    pubsub-shell

    # Start with an explicit config file
    pubsub-shell -c ~/pubsub-shell.json

    # Connect to a configured server right away
    pubsub-shell -s server1

Type help inside the shell for the list of commands.
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("pubsub-shell {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(args: &[&str]) -> Vec<OsString> {
        std::iter::once("pubsub-shell")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_default_args() {
        let result = parse_args_from(args(&[])).unwrap();
        assert!(result.config.is_none());
        assert!(result.server.is_none());
        assert!(result.log_level.is_none());
        assert!(!result.help);
        assert!(!result.version);
    }

    #[test]
    fn test_config_file() {
        let result = parse_args_from(args(&["-c", "/etc/pubsub.json"])).unwrap();
        assert_eq!(result.config, Some(PathBuf::from("/etc/pubsub.json")));

        let result = parse_args_from(args(&["--config", "/etc/pubsub.json"])).unwrap();
        assert_eq!(result.config, Some(PathBuf::from("/etc/pubsub.json")));
    }

    #[test]
    fn test_server() {
        let result = parse_args_from(args(&["-s", "server1"])).unwrap();
        assert_eq!(result.server, Some("server1".to_string()));

        let result = parse_args_from(args(&["--server", "server2"])).unwrap();
        assert_eq!(result.server, Some("server2".to_string()));
    }

    #[test]
    fn test_log_level() {
        let result = parse_args_from(args(&["-l", "debug"])).unwrap();
        assert_eq!(result.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_help_flag() {
        let result = parse_args_from(args(&["-h"])).unwrap();
        assert!(result.help);

        let result = parse_args_from(args(&["--help"])).unwrap();
        assert!(result.help);
    }

    #[test]
    fn test_version_flag() {
        let result = parse_args_from(args(&["-V"])).unwrap();
        assert!(result.version);

        let result = parse_args_from(args(&["--version"])).unwrap();
        assert!(result.version);
    }

    #[test]
    fn test_unexpected_positional() {
        let result = parse_args_from(args(&["stray"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_flag() {
        let result = parse_args_from(args(&["--bogus"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_combined_options() {
        let result = parse_args_from(args(&[
            "-c",
            "/tmp/config.json",
            "-s",
            "server1",
            "-l",
            "debug",
        ]))
        .unwrap();

        assert_eq!(result.config, Some(PathBuf::from("/tmp/config.json")));
        assert_eq!(result.server, Some("server1".to_string()));
        assert_eq!(result.log_level, Some("debug".to_string()));
    }
}
