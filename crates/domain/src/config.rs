//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, RENEWAL_PATH, SIGN_IN_PATH,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Outbound API client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every relative request target is joined onto
    pub base_url: String,
    /// Per-exchange transport timeout
    pub timeout_secs: u64,
    /// Path of the session renewal endpoint
    pub renewal_path: String,
    /// Sign-in surface to navigate to after an unrecoverable session loss
    pub sign_in_path: String,
    /// Upper bound on a single renewal call; `None` relies on the transport
    /// timeout alone
    pub renewal_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            renewal_path: RENEWAL_PATH.to_string(),
            sign_in_path: SIGN_IN_PATH.to_string(),
            renewal_timeout_secs: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn renewal_timeout(&self) -> Option<Duration> {
        self.renewal_timeout_secs.map(Duration::from_secs)
    }

    /// Absolute URL of the renewal endpoint
    pub fn renewal_url(&self) -> String {
        join_url(&self.base_url, &self.renewal_path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "fintrack=info".to_string(), json: false }
    }
}

/// Join a base URL and a target.
///
/// Absolute targets (`http://`, `https://`) are returned unchanged.
pub fn join_url(base: &str, target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        return target.to_string();
    }
    let base = base.trim_end_matches('/');
    if target.is_empty() {
        base.to_string()
    } else if target.starts_with('/') {
        format!("{base}{target}")
    } else {
        format!("{base}/{target}")
    }
}
