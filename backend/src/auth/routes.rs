//! Defines the HTTP routes specifically for authentication.

use axum::{routing::get, Router};

use super::handlers::me;
use crate::AppState;

pub fn auth_router() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
