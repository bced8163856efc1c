//! Generic data models for the `storage` crate.
//!
//! These models are the store-agnostic representation of verification votes
//! and reviews. Every store implementation converts its own row types into
//! them, so the backend services see a consistent shape regardless of the
//! database behind the trait objects.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user's current answer to "does this place serve piña coladas?".
///
/// There is at most one of these per `(place_id, user_id)`; a repeat vote
/// overwrites `has_pina_colada` and `created_at` while `id` stays the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    pub id: i64,
    pub place_id: String,
    pub user_id: i64,
    pub has_pina_colada: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for an insert-or-overwrite of a vote.
#[derive(Debug, Clone)]
pub struct NewVote {
    pub place_id: String,
    pub user_id: i64,
    pub has_pina_colada: bool,
    pub recorded_at: DateTime<Utc>,
}

/// Number of votes for one place that share the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteGroup {
    pub has_pina_colada: bool,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    /// Author's display name at the time of writing, if they had one.
    pub user_name: Option<String>,
    pub place_id: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i64,
    pub user_name: Option<String>,
    pub place_id: String,
    pub rating: i64,
    pub comment: String,
    pub recorded_at: DateTime<Utc>,
}

/// Mean rating over every review of a place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}
