//! Composition root for the session-aware API client
//!
//! One cookie jar is shared by the request transport and the renewer, and one
//! [`SignOut`] is shared by the renewal coordinator and [`AuthApi::logout`].

use std::sync::Arc;

use fintrack_core::{
    CredentialAttacher, CredentialStore, RenewalCoordinator, RequestClient, SignOut,
};
use fintrack_domain::{ClientConfig, Result};
use tokio::sync::broadcast;
use tracing::info;

use crate::api::{ApiClient, AuthApi, HttpSessionRenewer};
use crate::http::{HttpTransport, SessionCookies};
use crate::navigation::{SessionEvent, SessionEvents};

/// Fully wired client
#[derive(Clone)]
pub struct SessionClient {
    requests: RequestClient,
    api: ApiClient,
    auth: AuthApi,
    sign_out: Arc<SignOut>,
    cookies: Arc<SessionCookies>,
    events: SessionEvents,
}

impl SessionClient {
    /// Build every component from `config`, keeping credentials in `store`
    ///
    /// # Errors
    /// Returns `FinTrackError::Config` for an invalid base URL, or
    /// `FinTrackError::Network` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let cookies = Arc::new(SessionCookies::new());
        let events = SessionEvents::new();

        let mut builder = HttpTransport::builder()
            .base_url(&config.base_url)
            .renewal_path(&config.renewal_path)
            .timeout(config.timeout())
            .cookies(cookies.clone());
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent);
        }
        let transport = builder.build()?;

        let renewer = HttpSessionRenewer::new(transport.http().clone(), config.renewal_url());

        let sign_out = Arc::new(
            SignOut::new(store.clone(), cookies.clone(), Arc::new(events.clone()))
                .with_sign_in_path(&config.sign_in_path),
        );
        let coordinator = RenewalCoordinator::with_renewal_timeout(
            Arc::new(renewer),
            sign_out.clone(),
            config.renewal_timeout(),
        );
        let requests = RequestClient::new(
            Arc::new(transport),
            CredentialAttacher::new(store.clone()),
            coordinator,
        );
        let api = ApiClient::new(requests.clone());
        let auth = AuthApi::new(api.clone(), store, sign_out.clone());

        info!(base_url = %config.base_url, renewal = %config.renewal_url(), "session client ready");

        Ok(Self { requests, api, auth, sign_out, cookies, events })
    }

    /// Raw logical-request pipeline
    pub fn requests(&self) -> &RequestClient {
        &self.requests
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    pub fn sign_out(&self) -> &Arc<SignOut> {
        &self.sign_out
    }

    pub fn cookies(&self) -> &Arc<SessionCookies> {
        &self.cookies
    }

    /// Receive a [`SessionEvent`] whenever the session ends
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
