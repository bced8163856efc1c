//! Ratings and reviews for places.

use chrono::Utc;
use storage::{NewReview, RatingSummary, Review, ReviewStore, StoreError};
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::database::Database;
use crate::errors::ValidationError;
use crate::utils::PlaceId;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;
pub const MAX_COMMENT_CHARS: usize = 1000;

/// A review that passed input validation.
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    place_id: PlaceId,
    rating: i64,
    comment: String,
}

impl ReviewDraft {
    pub fn new(place_id: &str, rating: i64, comment: &str) -> Result<Self, ValidationError> {
        let place_id = PlaceId::parse(place_id)?;
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }
        let comment = comment.trim();
        let chars = comment.chars().count();
        if chars == 0 || chars > MAX_COMMENT_CHARS {
            return Err(ValidationError::CommentLength {
                max: MAX_COMMENT_CHARS,
            });
        }
        Ok(Self {
            place_id,
            rating,
            comment: comment.to_owned(),
        })
    }
}

#[derive(Clone)]
pub struct ReviewService {
    db: Database,
}

impl ReviewService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stores the review under `author`, keeping their display name with it.
    pub async fn add_review(
        &self,
        author: &AuthUser,
        draft: ReviewDraft,
    ) -> Result<Review, StoreError> {
        let place_id = draft.place_id.to_string();
        let user_id = author.id;
        let review = NewReview {
            user_id,
            user_name: author.name.clone(),
            place_id: draft.place_id.as_str().to_owned(),
            rating: draft.rating,
            comment: draft.comment,
            recorded_at: Utc::now(),
        };

        let result = match self.db.store() {
            Ok(store) => store.insert_review(review).await,
            Err(err) => Err(err),
        };
        match &result {
            Ok(review) => info!(%place_id, user_id, review_id = review.id, "review added"),
            Err(err) => warn!(%place_id, user_id, error = %err, "cannot add review"),
        }
        result
    }

    /// Newest first; empty when the store is unavailable.
    pub async fn list_reviews(&self, place_id: &PlaceId) -> Vec<Review> {
        let listed = match self.db.store() {
            Ok(store) => store.reviews_for_place(place_id.as_str()).await,
            Err(err) => Err(err),
        };
        listed.unwrap_or_else(|err| {
            warn!(%place_id, error = %err, "cannot get reviews");
            Vec::new()
        })
    }

    /// Returns whether a review owned by `user_id` was removed.
    pub async fn delete_review(&self, review_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let result = match self.db.store() {
            Ok(store) => store.delete_review(review_id, user_id).await,
            Err(err) => Err(err),
        };
        match &result {
            Ok(true) => info!(review_id, user_id, "review deleted"),
            Ok(false) => {}
            Err(err) => warn!(review_id, user_id, error = %err, "cannot delete review"),
        }
        result
    }

    /// `None` when nobody has reviewed the place, or the store is unavailable.
    pub async fn rating_summary(&self, place_id: &PlaceId) -> Option<RatingSummary> {
        let summary = match self.db.store() {
            Ok(store) => store.rating_summary(place_id.as_str()).await,
            Err(err) => Err(err),
        };
        summary.unwrap_or_else(|err| {
            warn!(%place_id, error = %err, "cannot get average rating");
            None
        })
    }
}
