//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use huddle_domain::{Config, HuddleError};
use huddle_infra::config;
use tempfile::TempDir;

#[test]
fn test_load_config_from_json_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "remote": {
                "base_url": "https://huddle.example.com/db",
                "auth_token": "json-token",
                "request_timeout_ms": 3000
            },
            "local": { "path": "/tmp/huddle_integration.db", "pool_size": 2 },
            "sync": { "autosave_debounce_ms": 400, "remote_timeout_ms": 2500 },
            "selection": { "update_throttle_ms": 16, "tap_threshold_px": 4.0 },
            "scoring": { "share_top_slots": 5 },
            "logging": { "level": "debug", "json": true }
        }"#,
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("Failed to load JSON config");

    assert_eq!(config.remote.base_url, "https://huddle.example.com/db");
    assert_eq!(config.remote.auth_token.as_deref(), Some("json-token"));
    assert_eq!(config.remote.request_timeout_ms, 3000);
    assert_eq!(config.local.path, "/tmp/huddle_integration.db");
    assert_eq!(config.local.pool_size, 2);
    assert_eq!(config.sync.autosave_debounce_ms, 400);
    assert_eq!(config.sync.remote_timeout_ms, 2500);
    assert_eq!(config.selection.update_throttle_ms, 16);
    assert_eq!(config.selection.tap_threshold_px, 4.0);
    assert_eq!(config.scoring.share_top_slots, 5);
    assert!(config.logging.json);
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("huddle.toml");
    std::fs::write(
        &path,
        r#"
[remote]
base_url = "https://huddle.example.com"

[local]
path = "/tmp/huddle_integration_toml.db"
pool_size = 8

[scoring]
minimum_participants = 3
best_score_threshold = 0.75
"#,
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("Failed to load TOML config");

    assert_eq!(config.local.pool_size, 8);
    assert_eq!(config.scoring.minimum_participants, 3);
    assert_eq!(config.scoring.best_score_threshold, 0.75);
    assert_eq!(config.sync, Config::default().sync);
}

#[test]
fn test_load_config_with_empty_document() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{}").expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("Failed to load empty config");
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/path/config.json".into()));

    match result {
        Err(HuddleError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_load_config_with_invalid_format() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "this is": "not valid" "#).expect("Failed to write config");

    match config::load_from_file(Some(path)) {
        Err(HuddleError::Config(msg)) => {
            assert!(msg.contains("Invalid JSON"), "Error message should mention invalid JSON");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}
