//! Clearable cookie jar for the ambient session
//!
//! The API keeps its session in httpOnly cookies that rotate on every
//! renewal. The jar is shared by the request transport and the renewal call
//! so a rotated cookie is visible to every replay, and it can be emptied on
//! sign-out. Storage and matching (`Expires`, `Max-Age`, `Secure`, `Path`,
//! `Domain`) follow RFC 6265 via `cookie_store`.

use std::fmt;
use std::sync::{MutexGuard, PoisonError};

use cookie_store::CookieStore;
use fintrack_core::AmbientSession;
use reqwest::cookie::CookieStore as _;
use reqwest::header::HeaderValue;
use reqwest_cookie_store::CookieStoreMutex;
use tracing::debug;
use url::Url;

/// Session cookie jar usable as a reqwest cookie provider
pub struct SessionCookies {
    jar: CookieStoreMutex,
}

impl SessionCookies {
    pub fn new() -> Self {
        Self { jar: CookieStoreMutex::new(CookieStore::default()) }
    }

    /// Value of cookie `name` that would be sent to `url`
    pub fn get(&self, url: &Url, name: &str) -> Option<String> {
        self.lock()
            .matches(url)
            .into_iter()
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_string())
    }

    /// Number of unexpired cookies held across all hosts
    pub fn len(&self) -> usize {
        self.lock().iter_unexpired().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply one `Set-Cookie` header received from `url`
    pub fn store(&self, url: &Url, set_cookie: &str) {
        if let Err(err) = self.lock().parse(set_cookie, url) {
            debug!(%url, error = %err, "Set-Cookie not stored");
        }
    }

    fn lock(&self) -> MutexGuard<'_, CookieStore> {
        self.jar.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionCookies {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionCookies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookies").field("len", &self.len()).finish()
    }
}

impl reqwest::cookie::CookieStore for SessionCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.jar.set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

impl AmbientSession for SessionCookies {
    fn clear(&self) {
        let mut jar = self.lock();
        let dropped = jar.iter_any().count();
        jar.clear();
        debug!(dropped, "cleared session cookies");
    }
}
