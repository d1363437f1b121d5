//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Huddle
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum HuddleError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A group with the same name already exists on the remote store.
    #[error("Group name already taken: {0}")]
    DuplicateGroupName(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HuddleError {
    /// Whether the failure is an I/O condition that a local fallback can
    /// paper over (unreachable remote, timeout, rejected credentials).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_) | Self::Auth(_) | Self::Storage(_))
    }

    /// Whether the failure is a business rule that must reach the caller.
    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::DuplicateGroupName(_))
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::DuplicateGroupName(_) => "duplicate_group_name",
            Self::NotFound(_) => "not_found",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Storage(_) => "storage",
            Self::Serialization(_) => "serialization",
            Self::Config(_) => "config",
            Self::Auth(_) => "auth",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for HuddleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Huddle operations
pub type Result<T> = std::result::Result<T, HuddleError>;
