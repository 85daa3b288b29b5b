//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use tempfile::NamedTempFile;

use pubsub_shell::cli::{parse_args_from, Args};
use pubsub_shell::config::Config;

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("pubsub-shell")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults() {
    let result = parse_args_from(args(&[])).unwrap();

    assert!(result.config.is_none());
    assert!(result.server.is_none());
    assert!(result.log_level.is_none());
    assert!(!result.help);
    assert!(!result.version);
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-c",
        "/tmp/pubsub.json",
        "-s",
        "server1",
        "-l",
        "debug",
    ]))
    .unwrap();

    assert_eq!(result.config.unwrap().to_str().unwrap(), "/tmp/pubsub.json");
    assert_eq!(result.server, Some("server1".to_string()));
    assert_eq!(result.log_level, Some("debug".to_string()));
}

#[test]
fn test_cli_rejects_positional() {
    let result = parse_args_from(args(&["server1"]));
    assert!(result.is_err());
}

#[test]
fn test_cli_rejects_unknown_flag() {
    let result = parse_args_from(args(&["--frobnicate"]));
    assert!(result.is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let json = r#"{
        "servers": {
            "server1": { "host": "s1.example.com", "port": 8000, "key": "k1" },
            "server2": { "host": "s2.example.com", "port": 8001 }
        },
        "default_server": "server2",
        "logging": {
            "level": "debug"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.servers.len(), 2);
    assert_eq!(config.server("server1").unwrap().host, "s1.example.com");
    assert_eq!(config.server("server1").unwrap().key.as_deref(), Some("k1"));
    assert_eq!(config.server("server2").unwrap().port, 8001);
    assert_eq!(config.default_server.as_deref(), Some("server2"));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_priority_cli_over_file() {
    let json = r#"{
        "servers": {
            "server1": { "host": "s1.example.com", "port": 8000 }
        },
        "default_server": "server1",
        "logging": { "level": "info" }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let cli_args = Args {
        config: Some(file.path().to_path_buf()),
        server: Some("server9".to_string()),
        log_level: Some("trace".to_string()),
        ..Args::default()
    };

    let config = Config::load(&cli_args).unwrap();

    // CLI values should win
    assert_eq!(config.default_server.as_deref(), Some("server9"));
    assert_eq!(config.logging.level, "trace");
    // File values survive where the CLI is silent
    assert_eq!(config.server("server1").unwrap().host, "s1.example.com");
}

#[test]
fn test_config_explicit_file_must_exist() {
    let cli_args = Args {
        config: Some("/nonexistent/pubsub-shell.json".into()),
        ..Args::default()
    };

    assert!(Config::load(&cli_args).is_err());
}

#[test]
fn test_config_invalid_json_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{ this is not json").unwrap();

    let cli_args = Args {
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    assert!(Config::load(&cli_args).is_err());
}

// ============================================================================
// Configuration Serialization Tests
// ============================================================================

#[test]
fn test_config_roundtrip() {
    let original = Config::default();
    let json = serde_json::to_string(&original).unwrap();
    let loaded: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(original.server_names(), loaded.server_names());
    assert_eq!(original.logging.level, loaded.logging.level);
}

#[test]
fn test_config_partial_deserialization() {
    // Only specify some fields, others should use defaults
    let json = r#"{"default_server": "local"}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.default_server.as_deref(), Some("local"));
    assert!(config.server("local").is_some()); // Default servers map
    assert_eq!(config.logging.level, "warn"); // Default
}

#[test]
fn test_server_entry_defaults() {
    let json = r#"{"servers": {"bare": {}}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    let bare = config.server("bare").unwrap();
    assert_eq!(bare.host, "localhost");
    assert_eq!(bare.port, 8000);
    assert!(bare.key.is_none());
    assert_eq!(bare.address(), "localhost:8000");
}
