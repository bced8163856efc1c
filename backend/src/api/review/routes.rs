//! Defines the HTTP routes for reviews.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{add_review, delete_review, list_reviews, rating};
use crate::AppState;

pub fn review_router() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(add_review))
        .route("/reviews/:review_id", delete(delete_review))
        .route("/places/:place_id/reviews", get(list_reviews))
        .route("/places/:place_id/rating", get(rating))
}
