//! Data structures for authentication-related entities.
//!
//! `Claims` is the JWT payload issued by the identity provider and `AuthUser`
//! is the validated principal handed to protected handlers.

use serde::{Deserialize, Serialize};

/// Payload stored in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric user id, carried as a string per RFC 7519.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    pub id: i64,
    pub name: Option<String>,
}
