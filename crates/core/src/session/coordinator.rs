//! Single-flight session renewal
//!
//! The coordinator is either `Idle` or `Refreshing`. The first caller that
//! finds it `Idle` starts an episode: one renewal call whose outcome is held in
//! a shared future. Every caller arriving while the episode is in flight
//! attaches to that same future. When the call settles the coordinator goes
//! back to `Idle` before any waiter observes the outcome, and a failed episode
//! triggers sign-out from that one settling path. Starting an episode re-arms
//! the sign-out latch, so every failed episode signs out once.
//!
//! The `Idle -> Refreshing` transition happens under a mutex that is never held
//! across an await.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use fintrack_domain::RequestError;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::ports::SessionRenewer;
use super::sign_out::{SignOut, SignOutReason};

/// Outcome every waiter of an episode observes
pub type RenewalOutcome = Result<(), RequestError>;

type SharedRenewal = Shared<BoxFuture<'static, RenewalOutcome>>;

enum RenewalState {
    Idle,
    Refreshing { episode: u64, outcome: SharedRenewal },
}

/// Snapshot of coordinator counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenewalStats {
    /// Episodes started (equals renewal calls issued)
    pub episodes: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Callers that attached to an episode someone else started
    pub joined: u64,
}

#[derive(Default)]
struct Counters {
    episodes: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    joined: AtomicU64,
}

struct Inner {
    renewer: Arc<dyn SessionRenewer>,
    sign_out: Arc<SignOut>,
    renewal_timeout: Option<Duration>,
    state: Mutex<RenewalState>,
    counters: Arc<Counters>,
}

/// Explicit, injectable renewal state machine.
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct RenewalCoordinator {
    inner: Arc<Inner>,
}

impl RenewalCoordinator {
    pub fn new(renewer: Arc<dyn SessionRenewer>, sign_out: Arc<SignOut>) -> Self {
        Self::with_renewal_timeout(renewer, sign_out, None)
    }

    /// Create a coordinator that fails an episode whose renewal call has not
    /// settled within `renewal_timeout`.
    pub fn with_renewal_timeout(
        renewer: Arc<dyn SessionRenewer>,
        sign_out: Arc<SignOut>,
        renewal_timeout: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                renewer,
                sign_out,
                renewal_timeout,
                state: Mutex::new(RenewalState::Idle),
                counters: Arc::new(Counters::default()),
            }),
        }
    }

    /// Wait for the current renewal episode, starting one if none is in
    /// flight.
    ///
    /// Never issues more than one renewal call per episode regardless of how
    /// many callers are waiting.
    pub async fn renew(&self) -> RenewalOutcome {
        let outcome = self.attach();
        outcome.await
    }

    /// Whether an episode is in flight
    pub fn is_refreshing(&self) -> bool {
        matches!(*self.inner.state.lock(), RenewalState::Refreshing { .. })
    }

    pub fn stats(&self) -> RenewalStats {
        let counters = &self.inner.counters;
        RenewalStats {
            episodes: counters.episodes.load(Ordering::Acquire),
            succeeded: counters.succeeded.load(Ordering::Acquire),
            failed: counters.failed.load(Ordering::Acquire),
            joined: counters.joined.load(Ordering::Acquire),
        }
    }

    pub fn sign_out(&self) -> &Arc<SignOut> {
        &self.inner.sign_out
    }

    fn attach(&self) -> SharedRenewal {
        let mut state = self.inner.state.lock();

        if let RenewalState::Refreshing { episode, outcome } = &*state {
            self.inner.counters.joined.fetch_add(1, Ordering::AcqRel);
            debug!(episode = *episode, "joining in-flight session renewal");
            return outcome.clone();
        }

        let episode = self.inner.counters.episodes.fetch_add(1, Ordering::AcqRel) + 1;
        info!(episode, "session expired; starting renewal");
        self.inner.sign_out.rearm();

        let outcome = run_episode(
            episode,
            Arc::clone(&self.inner.renewer),
            Arc::clone(&self.inner.sign_out),
            self.inner.renewal_timeout,
            Arc::clone(&self.inner.counters),
            Arc::downgrade(&self.inner),
        )
        .boxed()
        .shared();

        *state = RenewalState::Refreshing { episode, outcome: outcome.clone() };
        outcome
    }
}

impl fmt::Debug for RenewalCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenewalCoordinator")
            .field("refreshing", &self.is_refreshing())
            .field("stats", &self.stats())
            .field("renewal_timeout", &self.inner.renewal_timeout)
            .finish()
    }
}

/// Drive one episode. Runs exactly once per episode, on whichever waiter
/// polls the shared future first.
async fn run_episode(
    episode: u64,
    renewer: Arc<dyn SessionRenewer>,
    sign_out: Arc<SignOut>,
    renewal_timeout: Option<Duration>,
    counters: Arc<Counters>,
    coordinator: Weak<Inner>,
) -> RenewalOutcome {
    let result = match renewal_timeout {
        Some(limit) => match tokio::time::timeout(limit, renewer.renew()).await {
            Ok(result) => result,
            Err(_) => Err(RequestError::RenewalFailed(format!("renewal timed out after {limit:?}"))),
        },
        None => renewer.renew().await,
    };

    let outcome = result.map_err(|err| match err {
        RequestError::RenewalFailed(_) => err,
        other => RequestError::RenewalFailed(other.to_string()),
    });

    // Back to Idle before any waiter resumes, so the next auth failure starts
    // a fresh episode.
    if let Some(inner) = coordinator.upgrade() {
        let mut state = inner.state.lock();
        if matches!(&*state, RenewalState::Refreshing { episode: current, .. } if *current == episode)
        {
            *state = RenewalState::Idle;
        }
    }

    match &outcome {
        Ok(()) => {
            counters.succeeded.fetch_add(1, Ordering::AcqRel);
            info!(episode, "session renewed");
        }
        Err(err) => {
            counters.failed.fetch_add(1, Ordering::AcqRel);
            warn!(episode, error = %err, "session renewal failed");
            sign_out.sign_out(SignOutReason::RenewalFailed);
        }
    }

    outcome
}
