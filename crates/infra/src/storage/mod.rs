//! Credential store adapters
//!
//! [`MemoryCredentialStore`] keeps records for the lifetime of the process.
//! [`KeyringCredentialStore`] persists them in the platform keychain.

pub mod keychain;
pub mod memory;

pub use keychain::KeyringCredentialStore;
pub use memory::MemoryCredentialStore;
