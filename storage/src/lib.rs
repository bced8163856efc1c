//! Core `storage` crate for persisting crowd verifications and reviews.
//!
//! This crate defines the `VerificationStore` and `ReviewStore` traits, which
//! outline the row-level operations the backend needs from a relational store,
//! and provides the SQLite implementation used in production and in tests.
//! The backend only ever holds a `dyn Store`, so alternative databases can be
//! slotted in behind the same traits.

pub mod errors;
pub mod models;
pub mod sqlite;

use async_trait::async_trait;

pub use errors::StoreError;
pub use models::{NewReview, NewVote, RatingSummary, Review, VoteGroup, VoteRecord};
pub use sqlite::{PoolSettings, SqliteStore};

/// Row operations on the vote relation, keyed by `(place_id, user_id)`.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Inserts the vote, or overwrites the value and timestamp of the existing
    /// row for the same place and user. Must be a single atomic write.
    async fn upsert_vote(&self, vote: NewVote) -> Result<VoteRecord, StoreError>;

    async fn find_vote(&self, place_id: &str, user_id: i64)
        -> Result<Option<VoteRecord>, StoreError>;

    /// Grouped count of votes for a place. Values with no votes are omitted.
    async fn count_votes(&self, place_id: &str) -> Result<Vec<VoteGroup>, StoreError>;
}

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert_review(&self, review: NewReview) -> Result<Review, StoreError>;

    /// Reviews for a place, newest first.
    async fn reviews_for_place(&self, place_id: &str) -> Result<Vec<Review>, StoreError>;

    /// Deletes a review only if it belongs to `user_id`. Returns whether a row
    /// was removed.
    async fn delete_review(&self, review_id: i64, user_id: i64) -> Result<bool, StoreError>;

    /// `None` when the place has no reviews.
    async fn rating_summary(&self, place_id: &str) -> Result<Option<RatingSummary>, StoreError>;
}

/// Everything the backend needs from the persistent store.
#[async_trait]
pub trait Store: VerificationStore + ReviewStore {
    /// Cheap round trip used by health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
