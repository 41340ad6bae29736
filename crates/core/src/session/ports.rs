//! Port interfaces for the session-aware request pipeline
//!
//! These traits define the boundaries between the session core and
//! infrastructure implementations (HTTP, credential storage, UI shell).

use async_trait::async_trait;
use fintrack_domain::{LogicalRequest, RequestError, Result, TransportResponse};

/// Outcome of one transport exchange
pub type TransportResult = std::result::Result<TransportResponse, RequestError>;

/// Performs a single request/response exchange.
///
/// Implementations classify failures: a 401 on any target other than the
/// renewal endpoint must surface as [`RequestError::AuthExpired`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the non-error response
    async fn send(&self, request: &LogicalRequest) -> TransportResult;
}

/// Calls the external renewal endpoint.
///
/// Success means the ambient session credential has been replaced as a side
/// effect of the call.
#[async_trait]
pub trait SessionRenewer: Send + Sync {
    /// Issue one renewal call
    async fn renew(&self) -> std::result::Result<(), RequestError>;
}

/// Process-wide key/value store holding the locally-kept credential record
pub trait CredentialStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting a missing key succeeds
    fn remove(&self, key: &str) -> Result<()>;
}

/// The out-of-band session credential carried by the transport (cookies)
pub trait AmbientSession: Send + Sync {
    /// Drop every ambient session credential
    fn clear(&self);
}

/// Performs the full navigation to a UI surface
pub trait Navigator: Send + Sync {
    /// Navigate to `path`
    fn redirect(&self, path: &str);
}
