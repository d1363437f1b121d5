//! Tracing subscriber setup
//!
//! `HUDDLE_LOG` takes an `EnvFilter` directive and wins over the configured
//! level.

use huddle_domain::{HuddleError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV_VAR: &str = "HUDDLE_LOG";

/// Install the global subscriber.
///
/// # Errors
/// Returns `HuddleError::Config` for an unparsable level or when a global
/// subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|e| HuddleError::Config(format!("Failed to install subscriber: {e}")))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match std::env::var(LOG_ENV_VAR) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive)
            .map_err(|e| HuddleError::Config(format!("Invalid {LOG_ENV_VAR} directive: {e}"))),
        _ => EnvFilter::try_new(&config.level)
            .map_err(|e| HuddleError::Config(format!("Invalid log level: {e}"))),
    }
}
