//! Decorates outgoing requests with the locally-held credential
//!
//! The primary credential travels as a cookie; this header is the
//! back-compat path for sessions that still keep a bearer token locally.

use std::sync::Arc;

use fintrack_domain::constants::{AUTHORIZATION_HEADER, TOKEN_KEY};
use fintrack_domain::LogicalRequest;
use tracing::debug;

use super::ports::CredentialStore;

/// Adds `Authorization: Bearer <token>` when a token is stored
#[derive(Clone)]
pub struct CredentialAttacher {
    store: Arc<dyn CredentialStore>,
}

impl CredentialAttacher {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Return the request carrying the current credential, or unchanged if
    /// none is held. Never fails; an unreadable store counts as empty.
    pub fn attach(&self, request: &LogicalRequest) -> LogicalRequest {
        match self.token() {
            Some(token) => {
                request.clone().with_header(AUTHORIZATION_HEADER, format!("Bearer {token}"))
            }
            None => request.clone(),
        }
    }

    /// Currently stored bearer token
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                debug!(error = %err, "credential store unreadable; sending without token");
                None
            }
        }
    }
}
