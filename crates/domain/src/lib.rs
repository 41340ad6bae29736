//! # FinTrack Domain
//!
//! Domain types for the FinTrack API client.
//!
//! This crate contains:
//! - Request/response types (`LogicalRequest`, `RequestEnvelope`,
//!   `TransportResponse`)
//! - Error taxonomy and Result definitions
//! - Configuration structures
//! - Domain constants (endpoints, credential keys)
//!
//! ## Architecture
//! - No dependencies on other FinTrack crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
