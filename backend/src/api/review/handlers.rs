//! Handler functions for reviews.
//!
//! Writing and deleting require authentication; listing and the rating
//! summary are public and degrade to empty results when storage is down.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use storage::{RatingSummary, Review};

use crate::auth::AuthUser;
use crate::errors::ApiError;
use crate::services::reviews::ReviewDraft;
use crate::utils::PlaceId;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewRequest {
    pub place_id: String,
    pub rating: i64,
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

pub async fn add_review(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<AddReviewRequest>, JsonRejection>,
) -> Result<Json<Success>, ApiError> {
    let Json(request) = payload?;
    let draft = ReviewDraft::new(&request.place_id, request.rating, &request.comment)?;

    state.reviews.add_review(&user, draft).await?;
    Ok(Json(Success { success: true }))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let place_id = PlaceId::parse(&place_id)?;
    Ok(Json(state.reviews.list_reviews(&place_id).await))
}

pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    review_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Success>, ApiError> {
    let Path(review_id) = review_id?;
    if state.reviews.delete_review(review_id, user.id).await? {
        Ok(Json(Success { success: true }))
    } else {
        Err(ApiError::NotFound(format!("review {review_id} not found")))
    }
}

pub async fn rating(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<Option<RatingSummary>>, ApiError> {
    let place_id = PlaceId::parse(&place_id)?;
    Ok(Json(state.reviews.rating_summary(&place_id).await))
}
