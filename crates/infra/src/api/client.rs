//! Typed JSON API client
//!
//! Thin serde layer over [`RequestClient`]: every call goes through the
//! session-aware pipeline, so expired sessions are renewed and replayed
//! without the caller noticing.

use fintrack_core::RequestClient;
use fintrack_domain::{LogicalRequest, RequestError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

/// JSON API client over the session-aware request pipeline
#[derive(Clone)]
pub struct ApiClient {
    requests: RequestClient,
}

impl ApiClient {
    pub fn new(requests: RequestClient) -> Self {
        Self { requests }
    }

    /// Execute a GET request
    ///
    /// # Arguments
    ///
    /// * `path` - API path relative to the base URL (e.g., "/budgets")
    ///
    /// # Errors
    ///
    /// Returns the request's [`RequestError`], or
    /// [`RequestError::Decode`] if the body does not match `T`
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.send(LogicalRequest::get(path)).await
    }

    /// Execute a POST request with a JSON body
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidRequest`] if `body` cannot be
    /// serialized, otherwise as [`ApiClient::get`]
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(LogicalRequest::post(path).with_json(encode(body)?)).await
    }

    /// Execute a PUT request with a JSON body
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(LogicalRequest::put(path).with_json(encode(body)?)).await
    }

    /// Execute a PATCH request with a JSON body
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(LogicalRequest::patch(path).with_json(encode(body)?)).await
    }

    /// Execute a DELETE request
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.send(LogicalRequest::delete(path)).await
    }

    /// Session-aware pipeline behind this client
    pub fn requests(&self) -> &RequestClient {
        &self.requests
    }

    async fn send<T: DeserializeOwned>(&self, request: LogicalRequest) -> Result<T, RequestError> {
        self.requests.execute(request).await?.json()
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, RequestError> {
    serde_json::to_value(body)
        .map_err(|e| RequestError::InvalidRequest(format!("Failed to serialize body: {e}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use fintrack_core::testing::{
        MockCredentialStore, MockRenewer, RecordingNavigator, RecordingSession, ScriptedTransport,
    };
    use fintrack_core::{CredentialAttacher, RenewalCoordinator, SignOut};
    use fintrack_domain::{HttpMethod, TransportResponse};
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Budget {
        id: u64,
        name: String,
    }

    fn client(transport: Arc<ScriptedTransport>, renewer: Arc<MockRenewer>) -> ApiClient {
        let store = Arc::new(MockCredentialStore::new());
        let sign_out = Arc::new(SignOut::new(
            store.clone(),
            Arc::new(RecordingSession::default()),
            Arc::new(RecordingNavigator::default()),
        ));
        ApiClient::new(RequestClient::new(
            transport,
            CredentialAttacher::new(store),
            RenewalCoordinator::new(renewer, sign_out),
        ))
    }

    #[tokio::test]
    async fn get_decodes_json() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push("/budgets/1", Ok(TransportResponse::new(200, r#"{"id":1,"name":"Food"}"#)));
        let api = client(transport, Arc::new(MockRenewer::succeeding()));

        let budget: Budget = api.get("/budgets/1").await.unwrap();

        assert_eq!(budget, Budget { id: 1, name: "Food".into() });
    }

    #[tokio::test]
    async fn writes_carry_json_body_and_method() {
        let transport = Arc::new(ScriptedTransport::new());
        let api = client(transport.clone(), Arc::new(MockRenewer::succeeding()));
        let body = json!({"name": "Rent"});

        let _: serde_json::Value = api.post("/budgets", &body).await.unwrap();
        let _: serde_json::Value = api.put("/budgets/2", &body).await.unwrap();
        let _: serde_json::Value = api.patch("/budgets/2", &body).await.unwrap();

        let calls = transport.calls();
        let methods: Vec<_> = calls.iter().map(LogicalRequest::method).collect();
        assert_eq!(methods, vec![HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch]);
        assert!(calls.iter().all(|c| c.body() == Some(&body)));
    }

    #[tokio::test]
    async fn no_content_decodes_as_unit() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push("/budgets/2", Ok(TransportResponse::new(204, "")));
        let api = client(transport, Arc::new(MockRenewer::succeeding()));

        let result: Result<(), _> = api.delete("/budgets/2").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn decode_mismatch_is_a_decode_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push("/budgets/1", Ok(TransportResponse::new(200, r#"{"unexpected":true}"#)));
        let api = client(transport, Arc::new(MockRenewer::succeeding()));

        let result: Result<Budget, _> = api.get("/budgets/1").await;

        assert!(matches!(result, Err(RequestError::Decode(_))));
    }

    #[tokio::test]
    async fn expired_session_is_transparent_to_typed_calls() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push("/budgets/1", Err(RequestError::AuthExpired));
        transport.push("/budgets/1", Ok(TransportResponse::new(200, r#"{"id":1,"name":"Food"}"#)));
        let renewer = Arc::new(MockRenewer::succeeding());
        let api = client(transport, renewer.clone());

        let budget: Budget = api.get("/budgets/1").await.unwrap();

        assert_eq!(budget.id, 1);
        assert_eq!(renewer.calls(), 1);
    }
}
