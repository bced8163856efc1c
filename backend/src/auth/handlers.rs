//! Handler functions for authentication-related API endpoints.

use axum::Json;

use super::models::AuthUser;

/// Returns the principal the bearer token identifies.
pub async fn me(user: AuthUser) -> Json<AuthUser> {
    Json(user)
}
