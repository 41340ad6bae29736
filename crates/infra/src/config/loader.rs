//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `FINTRACK_API_URL` is unset, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `FINTRACK_API_URL`: API base URL (required)
//! - `FINTRACK_HTTP_TIMEOUT`: Per-request timeout in seconds
//! - `FINTRACK_RENEWAL_PATH`: Session renewal endpoint path
//! - `FINTRACK_SIGN_IN_PATH`: Sign-in surface to navigate to on sign-out
//! - `FINTRACK_RENEWAL_TIMEOUT`: Upper bound on one renewal call, in seconds
//! - `FINTRACK_USER_AGENT`: User-Agent header value
//! - `FINTRACK_LOG_FILTER`: Default `EnvFilter` directive
//! - `FINTRACK_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./fintrack.json` or `./fintrack.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use fintrack_domain::{ClientConfig, Config, FinTrackError, LoggingConfig, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing or a value is invalid, falls back to loading from a
/// config file.
///
/// # Errors
/// Returns `FinTrackError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
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
/// Only `FINTRACK_API_URL` is required; every other value falls back to its
/// default.
///
/// # Errors
/// Returns `FinTrackError::Config` if the required variable is missing or a
/// numeric value does not parse.
pub fn load_from_env() -> Result<Config> {
    let defaults = ClientConfig::default();

    let base_url = env_var("FINTRACK_API_URL")?;
    let timeout_secs =
        env_parse("FINTRACK_HTTP_TIMEOUT", "HTTP timeout")?.unwrap_or(defaults.timeout_secs);
    let renewal_timeout_secs = env_parse("FINTRACK_RENEWAL_TIMEOUT", "renewal timeout")?;
    let renewal_path = std::env::var("FINTRACK_RENEWAL_PATH").unwrap_or(defaults.renewal_path);
    let sign_in_path = std::env::var("FINTRACK_SIGN_IN_PATH").unwrap_or(defaults.sign_in_path);
    let user_agent = std::env::var("FINTRACK_USER_AGENT").ok();

    let logging_defaults = LoggingConfig::default();
    let filter = std::env::var("FINTRACK_LOG_FILTER").unwrap_or(logging_defaults.filter);
    let json = env_bool("FINTRACK_LOG_JSON", logging_defaults.json);

    Ok(Config {
        client: ClientConfig {
            base_url,
            timeout_secs,
            renewal_path,
            sign_in_path,
            renewal_timeout_secs,
            user_agent,
        },
        logging: LoggingConfig { filter, json },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Missing sections and fields take their defaults.
///
/// # Errors
/// Returns `FinTrackError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FinTrackError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FinTrackError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| FinTrackError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, by file extension
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| FinTrackError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| FinTrackError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(FinTrackError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["config.json", "config.toml", "fintrack.json", "fintrack.toml"];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots.iter().flat_map(|root| NAMES.iter().map(move |name| root.join(name))).find(|p| p.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| FinTrackError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional numeric environment variable
fn env_parse(key: &str, what: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| FinTrackError::Config(format!("Invalid {what}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 8] = [
        "FINTRACK_API_URL",
        "FINTRACK_HTTP_TIMEOUT",
        "FINTRACK_RENEWAL_PATH",
        "FINTRACK_SIGN_IN_PATH",
        "FINTRACK_RENEWAL_TIMEOUT",
        "FINTRACK_USER_AGENT",
        "FINTRACK_LOG_FILTER",
        "FINTRACK_LOG_JSON",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("FINTRACK_TEST_BOOL_YES", "Yes");
        std::env::set_var("FINTRACK_TEST_BOOL_OFF", "off");

        assert!(env_bool("FINTRACK_TEST_BOOL_YES", false));
        assert!(!env_bool("FINTRACK_TEST_BOOL_OFF", true));
        assert!(env_bool("FINTRACK_TEST_BOOL_MISSING", true));

        std::env::remove_var("FINTRACK_TEST_BOOL_YES");
        std::env::remove_var("FINTRACK_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("FINTRACK_API_URL", "https://api.fintrack.test/api/v1");
        std::env::set_var("FINTRACK_HTTP_TIMEOUT", "10");
        std::env::set_var("FINTRACK_RENEWAL_PATH", "/session/renew");
        std::env::set_var("FINTRACK_SIGN_IN_PATH", "/signin");
        std::env::set_var("FINTRACK_RENEWAL_TIMEOUT", "5");
        std::env::set_var("FINTRACK_USER_AGENT", "fintrack-test/1.0");
        std::env::set_var("FINTRACK_LOG_FILTER", "fintrack=debug");
        std::env::set_var("FINTRACK_LOG_JSON", "true");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.client.base_url, "https://api.fintrack.test/api/v1");
        assert_eq!(config.client.timeout_secs, 10);
        assert_eq!(config.client.renewal_path, "/session/renew");
        assert_eq!(config.client.sign_in_path, "/signin");
        assert_eq!(config.client.renewal_timeout_secs, Some(5));
        assert_eq!(config.client.user_agent.as_deref(), Some("fintrack-test/1.0"));
        assert_eq!(config.logging.filter, "fintrack=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_env_uses_defaults_for_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("FINTRACK_API_URL", "http://localhost:8080/api/v1");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.client.renewal_path, "/auth/refresh-token");
        assert_eq!(config.client.sign_in_path, "/login");
        assert!(config.client.renewal_timeout_secs.is_none());
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();

        assert!(matches!(err, FinTrackError::Config(msg) if msg.contains("FINTRACK_API_URL")));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("FINTRACK_API_URL", "http://localhost:3000/api/v1");
        std::env::set_var("FINTRACK_HTTP_TIMEOUT", "soon");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(FinTrackError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_extension() {
        let err = parse_config("", Path::new("config.yaml")).unwrap_err();
        assert!(matches!(err, FinTrackError::Config(msg) if msg.contains("yaml")));
    }

    #[test]
    fn test_load_from_file_missing_path() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/fintrack.toml"))).unwrap_err();
        assert!(matches!(err, FinTrackError::Config(_)));
    }
}
