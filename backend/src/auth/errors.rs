//! Custom error types specific to authentication failures.
//!
//! Every variant is surfaced to the caller as `401 Unauthorized`; none of
//! them leave a partial effect behind.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication required")]
    MissingToken,

    #[error("authorization header must use the Bearer scheme")]
    MalformedHeader,

    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    InvalidToken(String),
}
