//! Transport response model

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use crate::errors::RequestError;

/// Successful (non-error status) response from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    status: u16,
    headers: BTreeMap<String, String>,
    body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, headers: BTreeMap::new(), body: body.into() }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// 204/205 responses and empty bodies decode from `null`, so `()` and
    /// `Option<T>` work for endpoints without content.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        if self.status == 204 || self.status == 205 || self.body.trim().is_empty() {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                RequestError::Decode(format!(
                    "No content response ({}), but response type cannot be deserialized from empty body",
                    self.status
                ))
            });
        }

        serde_json::from_str(&self.body)
            .map_err(|e| RequestError::Decode(format!("Failed to parse response: {e}")))
    }
}
