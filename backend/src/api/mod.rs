//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the API domains: crowd
//! verification, bar filtering and reviews, plus the auth routes, all mounted
//! under `/api`.

pub mod bars;
pub mod review;
pub mod verification;

use axum::Router;

use crate::auth::auth_router;
use crate::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(verification::routes::verification_router())
        .merge(bars::routes::bars_router())
        .merge(review::routes::review_router())
        .nest("/auth", auth_router())
}
