//! HTTP transport and shared cookie jar

pub mod client;
pub mod cookies;

pub use client::{HttpTransport, HttpTransportBuilder};
pub use cookies::SessionCookies;
