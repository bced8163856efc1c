//! Extractor protecting authenticated routes.
//!
//! Handlers that take an `AuthUser` argument only run when the request
//! carries a valid `Authorization: Bearer <jwt>` header; otherwise the request
//! is rejected with `401` before the handler (and the store) is reached.

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tracing::debug;

use super::errors::AuthError;
use super::models::AuthUser;
use super::service::JwtValidator;
use crate::errors::ApiError;

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    JwtValidator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let user = JwtValidator::from_ref(state).verify(token).map_err(|err| {
            debug!(error = %err, "rejected bearer token");
            err
        })?;
        Ok(user)
    }
}
