//! # FinTrack Core
//!
//! Session logic for the FinTrack API client - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for transport, renewal, credential
//!   storage and navigation
//! - The single-flight renewal coordinator and idempotent sign-out
//! - The request client that ties them together
//!
//! ## Architecture Principles
//! - Only depends on `fintrack-domain`
//! - No HTTP, keychain, or UI code
//! - All external dependencies via traits

pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use session::{
    AmbientSession, CredentialAttacher, CredentialStore, Navigator, RenewalCoordinator,
    RenewalOutcome, RenewalStats, RequestClient, SessionRenewer, SignOut, SignOutReason,
    Transport, TransportResult,
};
