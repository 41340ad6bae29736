//! Platform keychain credential store
//!
//! Each record is one keychain entry under a fixed service name, keyed by
//! the record name (`token`, `isAuthenticated`).

use fintrack_core::CredentialStore;
use fintrack_domain::{FinTrackError, Result};
use keyring::Entry;
use tracing::debug;

use crate::errors::InfraError;

/// Default keychain service name
pub const DEFAULT_SERVICE: &str = "FinTrack.session";

/// Credential store backed by the platform keychain
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    service: String,
}

impl KeyringCredentialStore {
    /// Create a store for a specific keychain service (e.g., "FinTrack.session")
    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).map_err(|e| FinTrackError::from(InfraError::from(e)))
    }
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE)
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        debug!(service = %self.service, key, "reading credential from keychain");
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        debug!(service = %self.service, key, "storing credential in keychain");
        self.entry(key)?.set_password(value).map_err(|e| InfraError::from(e).into())
    }

    /// Idempotent: a missing entry is not an error
    fn remove(&self, key: &str) -> Result<()> {
        debug!(service = %self.service, key, "deleting credential from keychain");
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }
}
