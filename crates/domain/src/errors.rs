//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for FinTrack outside the request pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FinTrackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for FinTrack operations
pub type Result<T> = std::result::Result<T, FinTrackError>;

/// Coarse classification of a [`RequestError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, TLS or timeout failure
    Network,
    /// 4xx other than an expired session
    Client,
    /// 5xx
    Server,
    /// Session credential no longer accepted
    Authentication,
    /// Session could not be renewed; the user has been signed out
    SessionEnded,
    /// Failure produced locally before or after the exchange
    Local,
}

/// Failure of a single logical request.
///
/// `Clone` because one renewal outcome is observed by every request attached
/// to the same episode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Client error {status}: {message}")]
    Client { status: u16, message: String },

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Session credential expired")]
    AuthExpired,

    #[error("Session renewal failed: {0}")]
    RenewalFailed(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RequestError {
    /// Get the category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) => ErrorCategory::Network,
            Self::Client { .. } => ErrorCategory::Client,
            Self::Server { .. } => ErrorCategory::Server,
            Self::AuthExpired => ErrorCategory::Authentication,
            Self::RenewalFailed(_) => ErrorCategory::SessionEnded,
            Self::Decode(_) | Self::InvalidRequest(_) => ErrorCategory::Local,
        }
    }

    /// Whether the server rejected the session credential
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// Whether the failure ended the session (caller should present
    /// "session expired")
    pub fn is_session_ended(&self) -> bool {
        matches!(self, Self::RenewalFailed(_))
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::AuthExpired => Some(401),
            _ => None,
        }
    }
}

impl From<RequestError> for FinTrackError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Network(message) => Self::Network(message),
            RequestError::AuthExpired | RequestError::RenewalFailed(_) => {
                Self::Auth(err.to_string())
            }
            RequestError::InvalidRequest(message) => Self::InvalidInput(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(RequestError::Network("down".into()).category(), ErrorCategory::Network);
        assert_eq!(
            RequestError::Client { status: 404, message: String::new() }.category(),
            ErrorCategory::Client
        );
        assert_eq!(
            RequestError::Server { status: 502, message: String::new() }.category(),
            ErrorCategory::Server
        );
        assert_eq!(RequestError::AuthExpired.category(), ErrorCategory::Authentication);
        assert_eq!(
            RequestError::RenewalFailed("rejected".into()).category(),
            ErrorCategory::SessionEnded
        );
        assert_eq!(RequestError::Decode("bad".into()).category(), ErrorCategory::Local);
    }

    #[test]
    fn test_status_helper() {
        assert_eq!(RequestError::AuthExpired.status(), Some(401));
        assert_eq!(RequestError::Server { status: 503, message: String::new() }.status(), Some(503));
        assert_eq!(RequestError::Network("reset".into()).status(), None);
    }

    #[test]
    fn test_conversion_into_fintrack_error() {
        let err: FinTrackError = RequestError::RenewalFailed("refresh rejected".into()).into();
        assert!(matches!(err, FinTrackError::Auth(msg) if msg.contains("refresh rejected")));

        let err: FinTrackError = RequestError::Network("timed out".into()).into();
        assert_eq!(err, FinTrackError::Network("timed out".into()));
    }

    #[test]
    fn test_fintrack_error_serializes_tagged() {
        let json = serde_json::to_value(FinTrackError::Config("missing url".into())).unwrap();
        assert_eq!(json["type"], "Config");
        assert_eq!(json["message"], "missing url");
    }
}
