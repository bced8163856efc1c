//! Defines the HTTP routes for crowd verification.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{policy, stats, submit_vote, user_vote};
use crate::AppState;

pub fn verification_router() -> Router<AppState> {
    Router::new()
        .route("/verifications", post(submit_vote))
        .route("/verifications/policy", get(policy))
        .route("/places/:place_id/verifications/stats", get(stats))
        .route("/places/:place_id/verifications/me", get(user_vote))
}
