//! Public entry point for executing logical requests
//!
//! Every request follows: decorate -> attempt 1 -> (renewal wait) ->
//! attempt 2 -> result. There is no third attempt.

use std::sync::Arc;

use fintrack_domain::{LogicalRequest, RequestEnvelope, RequestError};
use tracing::{debug, info, instrument, warn};

use super::attacher::CredentialAttacher;
use super::coordinator::RenewalCoordinator;
use super::ports::{Transport, TransportResult};

/// Executes requests with transparent, single-flight session renewal
#[derive(Clone)]
pub struct RequestClient {
    transport: Arc<dyn Transport>,
    attacher: CredentialAttacher,
    coordinator: RenewalCoordinator,
}

impl RequestClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        attacher: CredentialAttacher,
        coordinator: RenewalCoordinator,
    ) -> Self {
        Self { transport, attacher, coordinator }
    }

    /// Execute one logical request.
    ///
    /// An expired session on the first attempt is recovered by waiting for
    /// the coordinator's renewal episode and replaying the request once. Any
    /// other failure, or an expired session on the replay, is returned as-is.
    /// A failed renewal returns [`RequestError::RenewalFailed`] without a
    /// replay.
    #[instrument(skip(self, request), fields(method = %request.method(), target = %request.target()))]
    pub async fn execute(&self, request: LogicalRequest) -> TransportResult {
        let envelope = RequestEnvelope::new(request);

        match self.submit(&envelope).await {
            Err(RequestError::AuthExpired) => match envelope.replay() {
                Some(replay) => self.renew_and_replay(replay).await,
                None => Err(RequestError::AuthExpired),
            },
            other => other,
        }
    }

    pub fn coordinator(&self) -> &RenewalCoordinator {
        &self.coordinator
    }

    pub fn attacher(&self) -> &CredentialAttacher {
        &self.attacher
    }

    async fn renew_and_replay(&self, replay: RequestEnvelope) -> TransportResult {
        debug!("session expired; waiting for renewal");

        if let Err(err) = self.coordinator.renew().await {
            warn!(error = %err, "dropping request after failed session renewal");
            return Err(err);
        }

        info!("replaying request after session renewal");
        self.submit(&replay).await
    }

    async fn submit(&self, envelope: &RequestEnvelope) -> TransportResult {
        let decorated = self.attacher.attach(envelope.request());
        debug!(attempt = ?envelope.attempt(), "submitting request");
        self.transport.send(&decorated).await
    }
}
