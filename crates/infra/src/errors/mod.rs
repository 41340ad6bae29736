//! Infrastructure error conversions

pub mod conversions;

pub use conversions::{classify_status, is_renewal_target, request_error_from_http, InfraError};
