//! Session-aware request pipeline
//!
//! ```text
//! caller -> RequestClient -> CredentialAttacher -> Transport
//!                 |  (AuthExpired, first attempt)
//!                 v
//!          RenewalCoordinator -> SessionRenewer
//!                 |  (failure)
//!                 v
//!              SignOut -> CredentialStore / AmbientSession / Navigator
//! ```

pub mod attacher;
pub mod client;
pub mod coordinator;
pub mod ports;
pub mod sign_out;

pub use attacher::CredentialAttacher;
pub use client::RequestClient;
pub use coordinator::{RenewalCoordinator, RenewalOutcome, RenewalStats};
pub use ports::{
    AmbientSession, CredentialStore, Navigator, SessionRenewer, Transport, TransportResult,
};
pub use sign_out::{SignOut, SignOutReason};
