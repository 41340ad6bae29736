//! Authentication endpoints
//!
//! Sign-in stores the local "authenticated" marker (and the bearer token when
//! the API returns one) and re-arms the shared sign-out latch. Logout goes
//! through the same [`SignOut`] as a failed renewal, so the two paths never
//! navigate twice.

use std::sync::Arc;

use fintrack_core::{CredentialStore, SignOut, SignOutReason};
use fintrack_domain::constants::{
    AUTHENTICATED_KEY, FORGOT_PASSWORD_PATH, LOGIN_PATH, LOGOUT_PATH, ME_PATH, REGISTER_PATH,
    RESET_PASSWORD_PATH, TOKEN_KEY,
};
use fintrack_domain::{
    ApiEnvelope, AuthSession, ForgotPasswordRequest, LoginCredentials, RegisterCredentials,
    RequestError, ResetPasswordRequest, StatusMessage, UserProfile,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use super::client::ApiClient;

/// Login, registration, profile and password endpoints
#[derive(Clone)]
pub struct AuthApi {
    api: ApiClient,
    store: Arc<dyn CredentialStore>,
    sign_out: Arc<SignOut>,
}

impl AuthApi {
    pub fn new(api: ApiClient, store: Arc<dyn CredentialStore>, sign_out: Arc<SignOut>) -> Self {
        Self { api, store, sign_out }
    }

    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<UserProfile, RequestError> {
        let envelope: ApiEnvelope<AuthSession> = self.api.post(LOGIN_PATH, credentials).await?;
        let session = require_data(envelope)?;
        self.mark_signed_in(session.token.as_deref());
        info!(user_id = session.user.id, "signed in");
        Ok(session.user)
    }

    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn register(
        &self,
        credentials: &RegisterCredentials,
    ) -> Result<UserProfile, RequestError> {
        let envelope: ApiEnvelope<AuthSession> = self.api.post(REGISTER_PATH, credentials).await?;
        let session = require_data(envelope)?;
        self.mark_signed_in(session.token.as_deref());
        info!(user_id = session.user.id, "registered and signed in");
        Ok(session.user)
    }

    /// Current user's profile
    pub async fn me(&self) -> Result<UserProfile, RequestError> {
        let envelope: ApiEnvelope<UserProfile> = self.api.get(ME_PATH).await?;
        require_data(envelope)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<StatusMessage, RequestError> {
        let request = ForgotPasswordRequest { email: email.to_string() };
        self.api.post(FORGOT_PASSWORD_PATH, &request).await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<StatusMessage, RequestError> {
        let request =
            ResetPasswordRequest { token: token.to_string(), new_password: new_password.to_string() };
        self.api.post(RESET_PASSWORD_PATH, &request).await
    }

    /// Sign out on the server, then locally.
    ///
    /// A failed server call is logged and does not stop the local sign-out.
    /// Returns `true` if this call performed the local sign-out, `false` if
    /// the session had already ended.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> bool {
        let result: Result<StatusMessage, RequestError> = self.api.post(LOGOUT_PATH, &json!({})).await;
        if let Err(err) = result {
            warn!(error = %err, "server logout failed; signing out locally");
        }
        self.sign_out.sign_out(SignOutReason::UserInitiated)
    }

    /// Whether a sign-in has been recorded and not since cleared
    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.get(AUTHENTICATED_KEY), Ok(Some(value)) if value == "true")
    }

    fn mark_signed_in(&self, token: Option<&str>) {
        if let Err(err) = self.store.set(AUTHENTICATED_KEY, "true") {
            warn!(error = %err, "failed to record authenticated flag");
        }
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            if let Err(err) = self.store.set(TOKEN_KEY, token) {
                warn!(error = %err, "failed to store session token");
            }
        }
        self.sign_out.rearm();
    }
}

fn require_data<T>(envelope: ApiEnvelope<T>) -> Result<T, RequestError> {
    let message = envelope.message.clone();
    envelope.data.ok_or_else(|| {
        RequestError::Decode(format!(
            "response carried no data: {}",
            message.unwrap_or_else(|| "no message".to_string())
        ))
    })
}
