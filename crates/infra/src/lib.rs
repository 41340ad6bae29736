//! # FinTrack Infrastructure
//!
//! Infrastructure implementations of the core session ports.
//!
//! This crate contains:
//! - HTTP transport and cookie jar (reqwest)
//! - Session renewer, typed API client and auth endpoints
//! - Credential stores (in-memory, platform keychain)
//! - Session event broadcasting, configuration loading, logging setup
//!
//! ## Architecture
//! - Implements traits defined in `fintrack-core`
//! - Contains all "impure" code (network, keychain, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod navigation;
pub mod observability;
pub mod session;
pub mod storage;

// Re-export commonly used items
pub use api::{ApiClient, AuthApi, HttpSessionRenewer};
pub use errors::InfraError;
pub use http::{HttpTransport, HttpTransportBuilder, SessionCookies};
pub use navigation::{SessionEvent, SessionEvents};
pub use observability::init_tracing;
pub use session::SessionClient;
pub use storage::{KeyringCredentialStore, MemoryCredentialStore};
