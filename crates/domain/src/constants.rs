//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// API defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Session endpoints and surfaces
pub const RENEWAL_PATH: &str = "/auth/refresh-token";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const FORGOT_PASSWORD_PATH: &str = "/auth/forgot-password";
pub const RESET_PASSWORD_PATH: &str = "/auth/reset-password";
pub const ME_PATH: &str = "/me";
pub const SIGN_IN_PATH: &str = "/login";

// Credential store keys
pub const TOKEN_KEY: &str = "token";
pub const AUTHENTICATED_KEY: &str = "isAuthenticated";

// Headers
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Status code reserved for an expired session
pub const AUTH_EXPIRED_STATUS: u16 = 401;
