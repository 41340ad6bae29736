//! FinTrack REST API adapters
//!
//! - [`HttpSessionRenewer`]: cookie-authenticated session renewal
//! - [`ApiClient`]: typed JSON calls over the session-aware pipeline
//! - [`AuthApi`]: sign-in, sign-up, profile, password and logout endpoints

pub mod auth;
pub mod client;
pub mod renewal;

pub use auth::AuthApi;
pub use client::ApiClient;
pub use renewal::HttpSessionRenewer;
