//! Conversions from external infrastructure errors into domain errors.

use fintrack_domain::constants::AUTH_EXPIRED_STATUS;
use fintrack_domain::{FinTrackError, RequestError};
use keyring::Error as KeyringError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FinTrackError);

impl From<InfraError> for FinTrackError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FinTrackError> for InfraError {
    fn from(value: FinTrackError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → FinTrackError */
/* -------------------------------------------------------------------------- */

impl From<KeyringError> for InfraError {
    fn from(value: KeyringError) -> Self {
        let description = value.to_string();

        let mapped = match value {
            KeyringError::NoEntry => FinTrackError::Storage("keychain entry not found".into()),
            KeyringError::BadEncoding(_) => {
                FinTrackError::Storage("credential in keychain is not valid UTF-8".into())
            }
            KeyringError::TooLong(name, limit) => FinTrackError::Storage(format!(
                "keychain attribute '{name}' exceeds platform limit ({limit})"
            )),
            KeyringError::Invalid(attr, reason) => {
                FinTrackError::Storage(format!("keychain attribute '{attr}' is invalid: {reason}"))
            }
            KeyringError::PlatformFailure(err) => {
                FinTrackError::Storage(format!("keychain platform error: {err}"))
            }
            KeyringError::NoStorageAccess(err) => {
                FinTrackError::Storage(format!("unable to access secure storage: {err}"))
            }
            _ => FinTrackError::Storage(description),
        };

        InfraError(mapped)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RequestError */
/* -------------------------------------------------------------------------- */

/// Map a reqwest failure that produced no HTTP response
pub fn request_error_from_http(err: &HttpError) -> RequestError {
    if err.is_timeout() {
        return RequestError::Network("HTTP request timed out".into());
    }

    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return RequestError::Network(format!("HTTP connection failure: {err}"));
    }

    if err.is_builder() {
        return RequestError::InvalidRequest(err.to_string());
    }

    if err.is_decode() || err.is_body() {
        return RequestError::Decode(err.to_string());
    }

    RequestError::Network(err.to_string())
}

/// Classify an error status.
///
/// `401` is an expired session on every target except the renewal endpoint,
/// where it is an ordinary client error.
pub fn classify_status(status: u16, target: &str, renewal_path: &str, body: &str) -> RequestError {
    if status == AUTH_EXPIRED_STATUS && !is_renewal_target(target, renewal_path) {
        return RequestError::AuthExpired;
    }

    let message = error_message(status, body);
    match status {
        500..=599 => RequestError::Server { status, message },
        _ => RequestError::Client { status, message },
    }
}

/// Whether `target` addresses the renewal endpoint
pub fn is_renewal_target(target: &str, renewal_path: &str) -> bool {
    let path = target.split(['?', '#']).next().unwrap_or(target).trim_end_matches('/');
    let renewal = renewal_path.trim_end_matches('/');
    !renewal.is_empty() && (path == renewal || path.ends_with(renewal))
}

/// Prefer the API's `{"message": ...}` envelope, then the raw body, then the
/// canonical reason phrase.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("unknown status")
        .to_string()
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::Client;

    use super::*;

    #[test]
    fn keyring_no_entry_maps_to_storage() {
        let mapped: FinTrackError = InfraError::from(KeyringError::NoEntry).into();
        match mapped {
            FinTrackError::Storage(msg) => assert!(msg.contains("keychain")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn unauthorized_is_auth_expired_except_on_renewal_endpoint() {
        assert_eq!(
            classify_status(401, "/budgets", "/auth/refresh-token", ""),
            RequestError::AuthExpired
        );
        assert_eq!(
            classify_status(401, "/auth/refresh-token", "/auth/refresh-token", ""),
            RequestError::Client { status: 401, message: "Unauthorized".into() }
        );
        assert_eq!(
            classify_status(
                401,
                "http://localhost:3000/api/v1/auth/refresh-token",
                "/auth/refresh-token",
                ""
            ),
            RequestError::Client { status: 401, message: "Unauthorized".into() }
        );
    }

    #[test]
    fn status_ranges_map_to_client_and_server() {
        assert!(matches!(
            classify_status(404, "/x", "/auth/refresh-token", ""),
            RequestError::Client { status: 404, .. }
        ));
        assert!(matches!(
            classify_status(403, "/x", "/auth/refresh-token", ""),
            RequestError::Client { status: 403, .. }
        ));
        assert!(matches!(
            classify_status(502, "/x", "/auth/refresh-token", ""),
            RequestError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn message_prefers_json_envelope() {
        let err = classify_status(
            400,
            "/transactions",
            "/auth/refresh-token",
            r#"{"status":"error","message":"amount is required"}"#,
        );
        assert_eq!(err, RequestError::Client { status: 400, message: "amount is required".into() });

        let err = classify_status(500, "/x", "/auth/refresh-token", "database down\n");
        assert_eq!(err, RequestError::Server { status: 500, message: "database down".into() });
    }

    #[test]
    fn renewal_target_ignores_query_and_trailing_slash() {
        assert!(is_renewal_target("/auth/refresh-token/?x=1", "/auth/refresh-token"));
        assert!(!is_renewal_target("/auth/refresh-token-history", "/auth/refresh-token"));
        assert!(!is_renewal_target("/budgets", ""));
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let err = client.get(format!("http://{addr}")).send().await.unwrap_err();

        assert!(matches!(request_error_from_http(&err), RequestError::Network(_)));
    }
}
