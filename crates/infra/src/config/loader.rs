//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required ones are missing, falls back to loading from file
//! 3. Searches the standard paths for a config file
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `HUDDLE_REMOTE_URL` (required): base URL of the remote document store
//! - `HUDDLE_DB_PATH` (required): SQLite mirror path
//! - `HUDDLE_REMOTE_TOKEN`: auth token appended to remote requests
//! - `HUDDLE_DB_POOL_SIZE`: connection pool size
//! - `HUDDLE_REMOTE_TIMEOUT_MS`: upper bound on one remote call
//! - `HUDDLE_AUTOSAVE_DEBOUNCE_MS`: quiet period before an autosave fires
//! - `HUDDLE_LOG_LEVEL`: default log level
//! - `HUDDLE_LOG_JSON`: emit JSON log lines (true/false)
//!
//! Selection and scoring settings only come from files; the environment
//! path keeps their defaults.
//!
//! ## File Locations
//! `config.{json,toml}` and `huddle.{json,toml}` in the current working
//! directory, then `config.{json,toml}` in its parent and grandparent, then
//! the same set relative to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use huddle_domain::{Config, HuddleError, Result};

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `HuddleError::Config` if neither source yields a valid config.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `HuddleError::Config` if a required variable is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.remote.base_url = env_var("HUDDLE_REMOTE_URL")?;
    config.remote.auth_token = std::env::var("HUDDLE_REMOTE_TOKEN").ok();
    config.local.path = env_var("HUDDLE_DB_PATH")?;

    if let Some(pool_size) = env_parse("HUDDLE_DB_POOL_SIZE", "pool size")? {
        config.local.pool_size = pool_size;
    }
    if let Some(timeout) = env_parse("HUDDLE_REMOTE_TIMEOUT_MS", "remote timeout")? {
        config.sync.remote_timeout_ms = timeout;
    }
    if let Some(debounce) = env_parse("HUDDLE_AUTOSAVE_DEBOUNCE_MS", "autosave debounce")? {
        config.sync.autosave_debounce_ms = debounce;
    }
    if let Ok(level) = std::env::var("HUDDLE_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("HUDDLE_LOG_JSON", config.logging.json);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations. Format is picked by
/// file extension.
///
/// # Errors
/// Returns `HuddleError::Config` if the file is missing or malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(HuddleError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            HuddleError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| HuddleError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HuddleError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| HuddleError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(HuddleError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn find_config_file() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("huddle.json"),
        dir.join("huddle.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| HuddleError::Config(format!("Missing required environment variable: {key}")))
}

/// Optional numeric variable; set but unparsable is an error.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| HuddleError::Config(format!("Invalid {what}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
