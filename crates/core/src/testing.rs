//! In-memory test doubles for the session ports
//!
//! Available to this crate's tests and, with the `test-utils` feature, to
//! downstream test suites.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use fintrack_domain::constants::TOKEN_KEY;
use fintrack_domain::{FinTrackError, LogicalRequest, RequestError, Result, TransportResponse};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::session::ports::{
    AmbientSession, CredentialStore, Navigator, SessionRenewer, Transport, TransportResult,
};

/// Credential store backed by a `HashMap`, with switchable failures
#[derive(Debug, Default)]
pub struct MockCredentialStore {
    values: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }
}

impl CredentialStore for MockCredentialStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(FinTrackError::Storage("mock read failure".into()));
        }
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FinTrackError::Storage("mock write failure".into()));
        }
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FinTrackError::Storage("mock write failure".into()));
        }
        self.values.lock().remove(key);
        Ok(())
    }
}

/// Transport answering from per-target queues and recording every request.
///
/// A target with an empty queue answers `200 {}`.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<HashMap<String, VecDeque<TransportResult>>>,
    calls: Mutex<Vec<LogicalRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next result for `target`
    pub fn push(&self, target: &str, result: TransportResult) {
        self.script.lock().entry(target.to_string()).or_default().push_back(result);
    }

    /// Every request received, in order, as decorated by the client
    pub fn calls(&self) -> Vec<LogicalRequest> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, target: &str) -> usize {
        self.calls.lock().iter().filter(|r| r.target() == target).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &LogicalRequest) -> TransportResult {
        self.calls.lock().push(request.clone());
        let next = self.script.lock().get_mut(request.target()).and_then(VecDeque::pop_front);
        next.unwrap_or_else(|| Ok(TransportResponse::new(200, "{}")))
    }
}

const RELEASED_PERMITS: usize = 1024;

/// Renewer with a scripted outcome and an optional gate that holds every call
/// until [`MockRenewer::release`].
pub struct MockRenewer {
    calls: AtomicUsize,
    default_outcome: std::result::Result<(), RequestError>,
    outcomes: Mutex<VecDeque<std::result::Result<(), RequestError>>>,
    gate: Option<Semaphore>,
    token_update: Mutex<Option<(Arc<dyn CredentialStore>, String)>>,
}

impl MockRenewer {
    pub fn succeeding() -> Self {
        Self::with_default(Ok(()))
    }

    pub fn failing(reason: &str) -> Self {
        Self::with_default(Err(RequestError::RenewalFailed(reason.to_string())))
    }

    fn with_default(default_outcome: std::result::Result<(), RequestError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            default_outcome,
            outcomes: Mutex::new(VecDeque::new()),
            gate: None,
            token_update: Mutex::new(None),
        }
    }

    /// Hold calls until [`MockRenewer::release`]
    #[must_use]
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Let every held and future call through
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(RELEASED_PERMITS);
        }
    }

    /// Queue an outcome ahead of the default one
    pub fn push_outcome(&self, outcome: std::result::Result<(), RequestError>) {
        self.outcomes.lock().push_back(outcome);
    }

    /// On success, store `token` as the new credential record
    pub fn writes_token(&self, store: Arc<dyn CredentialStore>, token: &str) {
        *self.token_update.lock() = Some((store, token.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionRenewer for MockRenewer {
    async fn renew(&self) -> std::result::Result<(), RequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let outcome =
            self.outcomes.lock().pop_front().unwrap_or_else(|| self.default_outcome.clone());

        if outcome.is_ok() {
            let update = self.token_update.lock().clone();
            if let Some((store, token)) = update {
                store.set(TOKEN_KEY, &token).map_err(|e| RequestError::RenewalFailed(e.to_string()))?;
            }
        }

        outcome
    }
}

/// Counts ambient-session clears
#[derive(Debug, Default)]
pub struct RecordingSession {
    clears: AtomicUsize,
}

impl RecordingSession {
    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl AmbientSession for RecordingSession {
    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

/// Records every redirect
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.redirects.lock().push(path.to_string());
    }
}
