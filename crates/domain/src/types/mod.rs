//! Request, response and API payload types shared by the core and its adapters

pub mod auth;
pub mod request;
pub mod response;

pub use auth::{
    ApiEnvelope, AuthSession, ForgotPasswordRequest, LoginCredentials, RegisterCredentials,
    ResetPasswordRequest, StatusMessage, UserProfile,
};
pub use request::{Attempt, HttpMethod, LogicalRequest, RequestEnvelope};
pub use response::TransportResponse;
