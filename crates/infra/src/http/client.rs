use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fintrack_core::{Transport, TransportResult};
use fintrack_domain::config::join_url;
use fintrack_domain::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, JSON_CONTENT_TYPE, RENEWAL_PATH,
};
use fintrack_domain::{FinTrackError, HttpMethod, LogicalRequest, RequestError, TransportResponse};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method};
use tracing::debug;

use super::cookies::SessionCookies;
use crate::errors::{classify_status, request_error_from_http};

/// HTTP transport performing exactly one exchange per call.
///
/// Relative targets are joined onto the base URL. Error statuses are
/// classified into [`RequestError`]; `401` outside the renewal endpoint
/// becomes [`RequestError::AuthExpired`].
#[derive(Clone)]
pub struct HttpTransport {
    client: ReqwestClient,
    base_url: String,
    renewal_path: String,
}

impl HttpTransport {
    /// Start building a new transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Underlying reqwest client, sharing this transport's cookie jar
    pub fn http(&self) -> &ReqwestClient {
        &self.client
    }

    fn url_for(&self, target: &str) -> String {
        join_url(&self.base_url, target)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &LogicalRequest) -> TransportResult {
        let url = self.url_for(request.target());
        let method = to_reqwest_method(request.method());

        let mut builder = self.client.request(method.clone(), &url);
        for (name, value) in request.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RequestError::InvalidRequest(format!("invalid header name: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| RequestError::InvalidRequest(format!("invalid header value: {e}")))?;
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        debug!(%method, %url, "sending HTTP request");

        let response = builder.send().await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            request_error_from_http(&err)
        })?;

        let status = response.status();
        debug!(%method, %url, %status, "received HTTP response");

        if status.is_client_error() || status.is_server_error() {
            // The status decides the classification; an unreadable body only
            // loses the message.
            let body = response.text().await.unwrap_or_else(|err| {
                debug!(%method, %url, %status, error = %err, "failed to read error body");
                String::new()
            });
            return Err(classify_status(status.as_u16(), &url, &self.renewal_path, &body));
        }

        let headers = collect_headers(response.headers());
        let body = response.text().await.map_err(|err| request_error_from_http(&err))?;

        Ok(TransportResponse::new(status.as_u16(), body).with_headers(headers))
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    base_url: String,
    renewal_path: String,
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
    cookies: Option<Arc<SessionCookies>>,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            renewal_path: RENEWAL_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
            cookies: None,
        }
    }
}

impl HttpTransportBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Path whose `401` responses are plain client errors
    pub fn renewal_path(mut self, path: impl Into<String>) -> Self {
        self.renewal_path = path.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Share `cookies` with every request sent through this transport
    pub fn cookies(mut self, cookies: Arc<SessionCookies>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    pub fn build(self) -> Result<HttpTransport, FinTrackError> {
        url::Url::parse(&self.base_url)
            .map_err(|e| FinTrackError::Config(format!("Invalid base URL '{}': {e}", self.base_url)))?;

        let mut headers = self.default_headers.unwrap_or_default();
        headers.entry(CONTENT_TYPE).or_insert(HeaderValue::from_static(JSON_CONTENT_TYPE));

        let mut builder =
            ReqwestClient::builder().timeout(self.timeout).no_proxy().default_headers(headers);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(cookies) = self.cookies {
            builder = builder.cookie_provider(cookies);
        }

        let client = builder
            .build()
            .map_err(|err| FinTrackError::Network(format!("failed to build HTTP client: {err}")))?;

        Ok(HttpTransport { client, base_url: self.base_url, renewal_path: self.renewal_path })
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
