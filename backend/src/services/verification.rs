//! Vote submission and lookup for crowd verification.
//!
//! A user has at most one vote per place. Voting again overwrites the earlier
//! answer and its timestamp; no history is kept. The store performs the
//! insert-or-overwrite as one atomic statement, so this service does no
//! check-then-write of its own.

use chrono::Utc;
use storage::{NewVote, StoreError, VerificationStore, VoteRecord};
use tracing::{info, warn};

use crate::database::Database;
use crate::utils::PlaceId;

#[derive(Clone)]
pub struct VerificationService {
    db: Database,
}

impl VerificationService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Records `user_id`'s answer for `place_id`, returning the stored row.
    /// Store failures are returned so the caller can tell the user.
    pub async fn submit_vote(
        &self,
        place_id: &PlaceId,
        user_id: i64,
        has_pina_colada: bool,
    ) -> Result<VoteRecord, StoreError> {
        let vote = NewVote {
            place_id: place_id.as_str().to_owned(),
            user_id,
            has_pina_colada,
            recorded_at: Utc::now(),
        };

        let result = match self.db.store() {
            Ok(store) => store.upsert_vote(vote).await,
            Err(err) => Err(err),
        };

        match &result {
            Ok(record) => info!(
                %place_id,
                user_id,
                has_pina_colada,
                vote_id = record.id,
                "verification recorded"
            ),
            Err(err) => warn!(%place_id, user_id, error = %err, "cannot add verification"),
        }
        result
    }

    /// The user's current vote, or `None` if they have not voted. Store
    /// failures are logged and also read as `None`.
    pub async fn user_vote(&self, place_id: &PlaceId, user_id: i64) -> Option<VoteRecord> {
        let found = match self.db.store() {
            Ok(store) => store.find_vote(place_id.as_str(), user_id).await,
            Err(err) => Err(err),
        };

        found.unwrap_or_else(|err| {
            warn!(%place_id, user_id, error = %err, "cannot get user verification");
            None
        })
    }
}
