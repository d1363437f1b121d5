//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUTOSAVE_DEBOUNCE_MS, DEFAULT_BEST_SCORE_THRESHOLD, DEFAULT_MINIMUM_PARTICIPANTS,
    DEFAULT_POPULAR_SLOTS_LIMIT, DEFAULT_REMOTE_TIMEOUT_MS, DEFAULT_SHARE_TOP_SLOTS,
    DEFAULT_TAP_THRESHOLD_PX, DEFAULT_UPDATE_THROTTLE_MS,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub local: LocalConfig,
    pub sync: SyncConfig,
    pub selection: SelectionConfig,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

/// Remote document store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
    /// Per-request HTTP timeout
    pub request_timeout_ms: u64,
    /// Total attempts per request (initial try + retries)
    pub max_attempts: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9000".to_string(),
            auth_token: None,
            request_timeout_ms: 5_000,
            max_attempts: 2,
        }
    }
}

/// On-device store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub path: String,
    pub pool_size: u32,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self { path: "huddle.db".to_string(), pool_size: 4 }
    }
}

/// Dual-write and autosave configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub autosave_debounce_ms: u64,
    /// Upper bound on a single remote call before it is treated as failed
    pub remote_timeout_ms: u64,
}

impl SyncConfig {
    /// Quiet period before an autosave fires.
    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    /// Upper bound on one remote call.
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
            remote_timeout_ms: DEFAULT_REMOTE_TIMEOUT_MS,
        }
    }
}

/// Drag-selection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub update_throttle_ms: u64,
    pub tap_threshold_px: f64,
}

impl SelectionConfig {
    /// Minimum gap between two selection recomputes.
    pub fn update_throttle(&self) -> Duration {
        Duration::from_millis(self.update_throttle_ms)
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            update_throttle_ms: DEFAULT_UPDATE_THROTTLE_MS,
            tap_threshold_px: DEFAULT_TAP_THRESHOLD_PX,
        }
    }
}

/// Ranking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub minimum_participants: usize,
    pub best_score_threshold: f64,
    pub popular_slots_limit: usize,
    pub share_top_slots: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            minimum_participants: DEFAULT_MINIMUM_PARTICIPANTS,
            best_score_threshold: DEFAULT_BEST_SCORE_THRESHOLD,
            popular_slots_limit: DEFAULT_POPULAR_SLOTS_LIMIT,
            share_top_slots: DEFAULT_SHARE_TOP_SLOTS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
