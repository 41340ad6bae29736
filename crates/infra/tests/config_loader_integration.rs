//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use fintrack_domain::FinTrackError;
use fintrack_infra::config;
use tempfile::Builder;

fn write_config(suffix: &str, contents: &str) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = Builder::new().prefix("fintrack-config").suffix(suffix).tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_config_from_json_file() -> anyhow::Result<()> {
    let json_content = r#"{
        "client": {
            "base_url": "https://api.fintrack.test/api/v1",
            "timeout_secs": 12,
            "renewal_timeout_secs": 4
        },
        "logging": {
            "filter": "fintrack=trace",
            "json": true
        }
    }"#;
    let file = write_config(".json", json_content)?;

    let config = config::load_from_file(Some(file.path().to_path_buf()))?;

    assert_eq!(config.client.base_url, "https://api.fintrack.test/api/v1");
    assert_eq!(config.client.timeout_secs, 12);
    assert_eq!(config.client.renewal_timeout_secs, Some(4));
    assert_eq!(
        config.client.renewal_url(),
        "https://api.fintrack.test/api/v1/auth/refresh-token"
    );
    assert_eq!(config.logging.filter, "fintrack=trace");
    assert!(config.logging.json);
    Ok(())
}

#[test]
fn test_load_config_from_toml_file() -> anyhow::Result<()> {
    let toml_content = r#"
[client]
base_url = "http://localhost:8080/api/v1"
renewal_path = "/session/renew"
sign_in_path = "/signin"
user_agent = "fintrack-desktop/0.1"
"#;
    let file = write_config(".toml", toml_content)?;

    let config = config::load_from_file(Some(file.path().to_path_buf()))?;

    assert_eq!(config.client.base_url, "http://localhost:8080/api/v1");
    assert_eq!(config.client.renewal_url(), "http://localhost:8080/api/v1/session/renew");
    assert_eq!(config.client.sign_in_path, "/signin");
    assert_eq!(config.client.user_agent.as_deref(), Some("fintrack-desktop/0.1"));
    // Omitted values keep their defaults
    assert_eq!(config.client.timeout_secs, 30);
    assert!(!config.logging.json);
    Ok(())
}

#[test]
fn test_empty_file_yields_defaults() -> anyhow::Result<()> {
    let file = write_config(".toml", "")?;

    let config = config::load_from_file(Some(file.path().to_path_buf()))?;

    assert_eq!(config, fintrack_domain::Config::default());
    Ok(())
}

#[test]
fn test_invalid_json_is_config_error() -> anyhow::Result<()> {
    let file = write_config(".json", "{ not json")?;

    let err = config::load_from_file(Some(file.path().to_path_buf())).unwrap_err();

    assert!(matches!(err, FinTrackError::Config(msg) if msg.contains("JSON")));
    Ok(())
}

#[test]
fn test_wrong_field_type_is_config_error() -> anyhow::Result<()> {
    let file = write_config(".toml", "[client]\ntimeout_secs = \"thirty\"\n")?;

    let err = config::load_from_file(Some(file.path().to_path_buf())).unwrap_err();

    assert!(matches!(err, FinTrackError::Config(msg) if msg.contains("TOML")));
    Ok(())
}
