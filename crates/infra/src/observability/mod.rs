//! Logging setup for binaries embedding the client
//!
//! Library code only emits `tracing` events. A binary calls
//! [`init_tracing`] once at startup to install a subscriber: an `EnvFilter`
//! (from `RUST_LOG`, else the configured directive) and a `fmt` layer,
//! human-readable or JSON.

use fintrack_domain::LoggingConfig;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Failure to install the global subscriber
#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("global tracing subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter`.
///
/// # Errors
/// Returns [`ObservabilityError::InvalidFilter`] if the configured directive
/// does not parse, or [`ObservabilityError::AlreadyInitialized`] if a global
/// subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> ObservabilityResult<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|e| ObservabilityError::AlreadyInitialized(e.to_string()))
}

fn build_filter(config: &LoggingConfig) -> ObservabilityResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.filter).map_err(|e| ObservabilityError::InvalidFilter {
        directive: config.filter.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter_is_used_without_rust_log() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig { filter: "fintrack=debug,reqwest=warn".into(), json: false };
        let filter = build_filter(&config).unwrap();
        assert!(filter.to_string().contains("fintrack=debug"));
    }

    #[test]
    fn malformed_filter_is_rejected() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig { filter: "fintrack=verbose".into(), json: false };
        assert!(matches!(build_filter(&config), Err(ObservabilityError::InvalidFilter { .. })));
    }

    #[test]
    fn second_install_reports_already_initialized() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(matches!(init_tracing(&config), Err(ObservabilityError::AlreadyInitialized(_))));
    }
}
