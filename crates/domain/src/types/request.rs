//! Outbound request model
//!
//! A [`LogicalRequest`] is what a call site hands to the request client. It is
//! immutable once built; the replay marker lives on [`RequestEnvelope`], which
//! only the request client creates.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP method of a logical request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One opaque API call: method, target, headers and optional JSON body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalRequest {
    method: HttpMethod,
    target: String,
    headers: BTreeMap<String, String>,
    body: Option<serde_json::Value>,
}

impl LogicalRequest {
    pub fn new(method: HttpMethod, target: impl Into<String>) -> Self {
        Self { method, target: target.into(), headers: BTreeMap::new(), body: None }
    }

    pub fn get(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, target)
    }

    pub fn post(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, target)
    }

    pub fn put(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, target)
    }

    pub fn patch(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, target)
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, target)
    }

    /// Set a header, replacing any existing header with the same name
    /// (case-insensitive).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value.into());
        self
    }

    #[must_use]
    pub fn with_json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

/// Which submission of a request this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// First submission
    Initial,
    /// The single replay after a session renewal
    Replay,
}

/// A logical request plus its replay marker.
///
/// A request can move from [`Attempt::Initial`] to [`Attempt::Replay`] once;
/// there is no way back and no third state.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    request: LogicalRequest,
    attempt: Attempt,
}

impl RequestEnvelope {
    pub fn new(request: LogicalRequest) -> Self {
        Self { request, attempt: Attempt::Initial }
    }

    pub fn request(&self) -> &LogicalRequest {
        &self.request
    }

    pub fn attempt(&self) -> Attempt {
        self.attempt
    }

    pub fn is_replay(&self) -> bool {
        self.attempt == Attempt::Replay
    }

    /// Mark the envelope for its one replay.
    ///
    /// Returns `None` if it has already been replayed.
    pub fn replay(self) -> Option<Self> {
        match self.attempt {
            Attempt::Initial => Some(Self { request: self.request, attempt: Attempt::Replay }),
            Attempt::Replay => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn with_header_replaces_case_insensitively() {
        let request = LogicalRequest::get("/budgets")
            .with_header("authorization", "Bearer old")
            .with_header("Authorization", "Bearer new");

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("AUTHORIZATION"), Some("Bearer new"));
    }

    #[test]
    fn builder_keeps_method_target_and_body() {
        let request = LogicalRequest::post("/transactions").with_json(json!({"amount": 12.5}));

        assert_eq!(request.method(), HttpMethod::Post);
        assert_eq!(request.target(), "/transactions");
        assert_eq!(request.body(), Some(&json!({"amount": 12.5})));
    }

    #[test]
    fn envelope_replays_at_most_once() {
        let envelope = RequestEnvelope::new(LogicalRequest::get("/me"));
        assert_eq!(envelope.attempt(), Attempt::Initial);

        let replay = envelope.replay().unwrap();
        assert!(replay.is_replay());
        assert_eq!(replay.request().target(), "/me");

        assert!(replay.replay().is_none());
    }

    #[test]
    fn reused_request_gets_a_fresh_marker() {
        let request = LogicalRequest::get("/categories");
        let first = RequestEnvelope::new(request.clone()).replay().unwrap();
        let second = RequestEnvelope::new(request);

        assert!(first.is_replay());
        assert!(!second.is_replay());
    }

    #[test]
    fn method_serializes_uppercase() {
        assert_eq!(serde_json::to_value(HttpMethod::Patch).unwrap(), json!("PATCH"));
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
