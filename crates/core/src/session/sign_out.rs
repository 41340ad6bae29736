//! Idempotent sign-out side effect
//!
//! Shared by the renewal coordinator and the user-initiated logout flow. A
//! single latch guards the effect, so concurrent or repeated triggers from
//! independent call sites produce one navigation. The latch is re-armed when
//! a renewal episode starts and when a sign-in succeeds.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use fintrack_domain::constants::{AUTHENTICATED_KEY, SIGN_IN_PATH, TOKEN_KEY};
use tracing::{debug, info, warn};

use super::ports::{AmbientSession, CredentialStore, Navigator};

/// Why a sign-out was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutReason {
    /// The renewal episode failed
    RenewalFailed,
    /// The user asked to sign out
    UserInitiated,
}

/// Clears local credentials and the ambient session, then navigates to the
/// sign-in surface. Runs at most once between calls to [`SignOut::rearm`].
pub struct SignOut {
    store: Arc<dyn CredentialStore>,
    session: Arc<dyn AmbientSession>,
    navigator: Arc<dyn Navigator>,
    sign_in_path: String,
    latched: AtomicBool,
    performed: AtomicU64,
}

impl SignOut {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        session: Arc<dyn AmbientSession>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            session,
            navigator,
            sign_in_path: SIGN_IN_PATH.to_string(),
            latched: AtomicBool::new(false),
            performed: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.sign_in_path = path.into();
        self
    }

    /// Run the sign-out side effect.
    ///
    /// Returns `true` if this call performed it, `false` if a sign-out is
    /// already in effect.
    pub fn sign_out(&self, reason: SignOutReason) -> bool {
        if self.latched.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err()
        {
            debug!(?reason, "sign-out already in effect; skipping");
            return false;
        }

        for key in [TOKEN_KEY, AUTHENTICATED_KEY] {
            if let Err(err) = self.store.remove(key) {
                warn!(key, error = %err, "failed to clear credential record");
            }
        }
        self.session.clear();
        self.navigator.redirect(&self.sign_in_path);
        self.performed.fetch_add(1, Ordering::Relaxed);

        match reason {
            SignOutReason::RenewalFailed => {
                warn!(redirect = %self.sign_in_path, "session could not be renewed; signed out");
            }
            SignOutReason::UserInitiated => {
                info!(redirect = %self.sign_in_path, "signed out");
            }
        }

        true
    }

    /// Allow the next sign-out to run again. Called when a renewal episode
    /// starts and after a successful sign-in.
    pub fn rearm(&self) {
        if self.latched.swap(false, Ordering::AcqRel) {
            debug!("sign-out latch re-armed");
        }
    }

    /// Whether a sign-out is in effect
    pub fn is_signed_out(&self) -> bool {
        self.latched.load(Ordering::Acquire)
    }

    /// How many times the side effect actually ran
    pub fn performed(&self) -> u64 {
        self.performed.load(Ordering::Relaxed)
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCredentialStore, RecordingNavigator, RecordingSession};

    struct Fixture {
        store: Arc<MockCredentialStore>,
        session: Arc<RecordingSession>,
        navigator: Arc<RecordingNavigator>,
        sign_out: SignOut,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MockCredentialStore::new());
        store.set(TOKEN_KEY, "token").unwrap();
        store.set(AUTHENTICATED_KEY, "true").unwrap();
        let session = Arc::new(RecordingSession::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let sign_out = SignOut::new(store.clone(), session.clone(), navigator.clone());
        Fixture { store, session, navigator, sign_out }
    }

    #[test]
    fn clears_credentials_and_redirects() {
        let f = fixture();

        assert!(f.sign_out.sign_out(SignOutReason::RenewalFailed));

        assert_eq!(f.store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(f.store.get(AUTHENTICATED_KEY).unwrap(), None);
        assert_eq!(f.session.clears(), 1);
        assert_eq!(f.navigator.redirects(), vec!["/login".to_string()]);
        assert!(f.sign_out.is_signed_out());
    }

    #[test]
    fn repeated_triggers_fire_once() {
        let f = fixture();

        assert!(f.sign_out.sign_out(SignOutReason::RenewalFailed));
        assert!(!f.sign_out.sign_out(SignOutReason::UserInitiated));
        assert!(!f.sign_out.sign_out(SignOutReason::RenewalFailed));

        assert_eq!(f.sign_out.performed(), 1);
        assert_eq!(f.navigator.redirects().len(), 1);
        assert_eq!(f.session.clears(), 1);
    }

    #[test]
    fn rearm_allows_next_sign_out() {
        let f = fixture();

        f.sign_out.sign_out(SignOutReason::UserInitiated);
        f.sign_out.rearm();
        assert!(!f.sign_out.is_signed_out());
        assert!(f.sign_out.sign_out(SignOutReason::RenewalFailed));

        assert_eq!(f.sign_out.performed(), 2);
    }

    #[test]
    fn custom_sign_in_path() {
        let f = fixture();
        let sign_out = SignOut::new(f.store.clone(), f.session.clone(), f.navigator.clone())
            .with_sign_in_path("/auth/sign-in");

        sign_out.sign_out(SignOutReason::UserInitiated);
        assert_eq!(f.navigator.redirects(), vec!["/auth/sign-in".to_string()]);
    }

    #[test]
    fn store_failure_does_not_block_navigation() {
        let f = fixture();
        f.store.fail_writes(true);

        assert!(f.sign_out.sign_out(SignOutReason::RenewalFailed));
        assert_eq!(f.navigator.redirects().len(), 1);
    }

    #[test]
    fn concurrent_triggers_fire_once() {
        let f = Arc::new(fixture());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let f = Arc::clone(&f);
                std::thread::spawn(move || f.sign_out.sign_out(SignOutReason::RenewalFailed))
            })
            .collect();
        let winners = handles.into_iter().filter_map(|h| h.join().ok()).filter(|won| *won).count();

        assert_eq!(winners, 1);
        assert_eq!(f.sign_out.performed(), 1);
        assert_eq!(f.navigator.redirects().len(), 1);
    }
}
