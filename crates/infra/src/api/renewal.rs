//! Session renewal over HTTP
//!
//! The renewal call carries no bearer credential. The API authenticates it
//! with the refresh cookie and answers with rotated session cookies, which
//! land in the jar shared with the request transport.

use async_trait::async_trait;
use fintrack_core::SessionRenewer;
use fintrack_domain::RequestError;
use reqwest::Client as ReqwestClient;
use serde_json::json;
use tracing::{debug, instrument};

use crate::errors::{classify_status, request_error_from_http};

/// Renews the session with `POST <renewal url>` and an empty JSON object
#[derive(Clone)]
pub struct HttpSessionRenewer {
    client: ReqwestClient,
    renewal_url: String,
}

impl HttpSessionRenewer {
    /// `client` must share the request transport's cookie jar
    pub fn new(client: ReqwestClient, renewal_url: impl Into<String>) -> Self {
        Self { client, renewal_url: renewal_url.into() }
    }

    pub fn renewal_url(&self) -> &str {
        &self.renewal_url
    }
}

#[async_trait]
impl SessionRenewer for HttpSessionRenewer {
    #[instrument(skip(self), fields(url = %self.renewal_url))]
    async fn renew(&self) -> Result<(), RequestError> {
        let response = self
            .client
            .post(&self.renewal_url)
            .json(&json!({}))
            .send()
            .await
            .map_err(|err| RequestError::RenewalFailed(request_error_from_http(&err).to_string()))?;

        let status = response.status();
        debug!(%status, "renewal endpoint answered");

        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let cause = classify_status(status.as_u16(), &self.renewal_url, &self.renewal_url, &body);
        Err(RequestError::RenewalFailed(cause.to_string()))
    }
}
