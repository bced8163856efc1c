//! SQLite-backed implementation of the store traits.
//!
//! This file contains the connection pool wrapper, the embedded schema
//! migrations and every SQL statement the backend relies on. The vote upsert
//! is a single `INSERT ... ON CONFLICT DO UPDATE` statement backed by the
//! `UNIQUE (place_id, user_id)` constraint, so two concurrent submissions from
//! the same user for the same place can never produce two rows.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::errors::StoreError;
use crate::models::{NewReview, NewVote, RatingSummary, Review, VoteGroup, VoteRecord};
use crate::{ReviewStore, Store, VerificationStore};

/// Pool tuning knobs exposed through the backend configuration.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    id: i64,
    place_id: String,
    user_id: i64,
    has_pina_colada: i64,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    user_id: i64,
    user_name: Option<String>,
    place_id: String,
    rating: i64,
    comment: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Converts the stored 0/1 column into a flag, refusing anything else.
fn flag_from_column(value: i64) -> Result<bool, StoreError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StoreError::CorruptRow {
            table: "bar_verifications",
            reason: format!("has_pina_colada = {other}"),
        }),
    }
}

impl TryFrom<VoteRow> for VoteRecord {
    type Error = StoreError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            place_id: row.place_id,
            user_id: row.user_id,
            has_pina_colada: flag_from_column(row.has_pina_colada)?,
            created_at: row.created_at,
        })
    }
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            place_id: row.place_id,
            rating: row.rating,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url` and applies migrations.
    pub async fn connect(url: &str, settings: PoolSettings) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// A private in-memory database. Pinned to a single connection that never
    /// expires, since each SQLite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("sqlite migrations applied");
        Ok(())
    }
}

#[async_trait]
impl VerificationStore for SqliteStore {
    async fn upsert_vote(&self, vote: NewVote) -> Result<VoteRecord, StoreError> {
        let row: VoteRow = sqlx::query_as(
            r#"
            INSERT INTO bar_verifications (place_id, user_id, has_pina_colada, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (place_id, user_id) DO UPDATE SET
                has_pina_colada = excluded.has_pina_colada,
                created_at = excluded.created_at
            RETURNING id, place_id, user_id, has_pina_colada, created_at
            "#,
        )
        .bind(&vote.place_id)
        .bind(vote.user_id)
        .bind(i64::from(vote.has_pina_colada))
        .bind(vote.recorded_at)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_vote(
        &self,
        place_id: &str,
        user_id: i64,
    ) -> Result<Option<VoteRecord>, StoreError> {
        let row: Option<VoteRow> = sqlx::query_as(
            "SELECT id, place_id, user_id, has_pina_colada, created_at
             FROM bar_verifications WHERE place_id = ?1 AND user_id = ?2 LIMIT 1",
        )
        .bind(place_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VoteRecord::try_from).transpose()
    }

    async fn count_votes(&self, place_id: &str) -> Result<Vec<VoteGroup>, StoreError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT has_pina_colada, COUNT(*) FROM bar_verifications
             WHERE place_id = ?1 GROUP BY has_pina_colada",
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(value, count)| {
                Ok(VoteGroup {
                    has_pina_colada: flag_from_column(value)?,
                    count,
                })
            })
            .collect()
    }
}

#[async_trait]
impl ReviewStore for SqliteStore {
    async fn insert_review(&self, review: NewReview) -> Result<Review, StoreError> {
        let row: ReviewRow = sqlx::query_as(
            r#"
            INSERT INTO reviews (user_id, user_name, place_id, rating, comment, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING id, user_id, user_name, place_id, rating, comment, created_at, updated_at
            "#,
        )
        .bind(review.user_id)
        .bind(&review.user_name)
        .bind(&review.place_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.recorded_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn reviews_for_place(&self, place_id: &str) -> Result<Vec<Review>, StoreError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            "SELECT id, user_id, user_name, place_id, rating, comment, created_at, updated_at
             FROM reviews WHERE place_id = ?1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(place_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn delete_review(&self, review_id: i64, user_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?1 AND user_id = ?2")
            .bind(review_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn rating_summary(&self, place_id: &str) -> Result<Option<RatingSummary>, StoreError> {
        let (average, count): (Option<f64>, i64) =
            sqlx::query_as("SELECT AVG(rating), COUNT(*) FROM reviews WHERE place_id = ?1")
                .bind(place_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(match average {
            Some(average) if count > 0 => Some(RatingSummary { average, count }),
            _ => None,
        })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    async fn store() -> SqliteStore {
        match SqliteStore::in_memory().await {
            Ok(store) => store,
            Err(err) => panic!("failed to open in-memory store: {err}"),
        }
    }

    fn vote(place_id: &str, user_id: i64, has_pina_colada: bool) -> NewVote {
        NewVote {
            place_id: place_id.to_string(),
            user_id,
            has_pina_colada,
            recorded_at: Utc::now(),
        }
    }

    fn review(place_id: &str, user_id: i64, rating: i64, at: DateTime<Utc>) -> NewReview {
        NewReview {
            user_id,
            user_name: Some(format!("user {user_id}")),
            place_id: place_id.to_string(),
            rating,
            comment: format!("rated {rating}"),
            recorded_at: at,
        }
    }

    #[tokio::test]
    async fn revote_overwrites_in_place() {
        let store = store().await;

        let first = store.upsert_vote(vote("place-B", 1, true)).await.unwrap();
        let second = store.upsert_vote(vote("place-B", 1, false)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(!second.has_pina_colada);
        assert!(second.created_at >= first.created_at);

        let groups = store.count_votes("place-B").await.unwrap();
        assert_eq!(
            groups,
            vec![VoteGroup {
                has_pina_colada: false,
                count: 1
            }]
        );
    }

    #[tokio::test]
    async fn votes_are_scoped_to_place_and_user() {
        let store = store().await;
        store.upsert_vote(vote("place-A", 1, true)).await.unwrap();
        store.upsert_vote(vote("place-A", 2, false)).await.unwrap();
        store.upsert_vote(vote("place-Z", 1, false)).await.unwrap();

        let mine = store.find_vote("place-A", 1).await.unwrap().unwrap();
        assert!(mine.has_pina_colada);
        assert_eq!(mine.user_id, 1);

        let other = store.find_vote("place-Z", 1).await.unwrap().unwrap();
        assert!(!other.has_pina_colada);

        assert!(store.find_vote("place-A", 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn count_votes_groups_by_value() {
        let store = store().await;
        for (user, value) in [(1, true), (2, true), (3, false)] {
            store.upsert_vote(vote("place-A", user, value)).await.unwrap();
        }

        let mut groups = store.count_votes("place-A").await.unwrap();
        groups.sort_by_key(|group| group.has_pina_colada);
        assert_eq!(
            groups,
            vec![
                VoteGroup {
                    has_pina_colada: false,
                    count: 1
                },
                VoteGroup {
                    has_pina_colada: true,
                    count: 2
                },
            ]
        );

        assert!(store.count_votes("never-voted").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn schema_rejects_a_second_row_for_the_same_voter() {
        let store = store().await;
        let insert = "INSERT INTO bar_verifications (place_id, user_id, has_pina_colada, created_at)
                      VALUES ('place-A', 1, ?1, ?2)";

        sqlx::query(insert)
            .bind(1_i64)
            .bind(Utc::now())
            .execute(&store.pool)
            .await
            .unwrap();
        let duplicate = sqlx::query(insert)
            .bind(0_i64)
            .bind(Utc::now())
            .execute(&store.pool)
            .await;

        match duplicate {
            Err(sqlx::Error::Database(err)) => assert!(err.is_unique_violation()),
            other => panic!("expected a unique violation, got {other:?}"),
        }
        assert_eq!(store.count_votes("place-A").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn corrupt_vote_value_is_reported() {
        let store = store().await;
        // Bypass the CHECK constraint to simulate a row written by another tool.
        sqlx::query("PRAGMA ignore_check_constraints = ON")
            .execute(&store.pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO bar_verifications (place_id, user_id, has_pina_colada, created_at)
             VALUES ('odd', 1, 7, ?1)",
        )
        .bind(Utc::now())
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store.find_vote("odd", 1).await.unwrap_err();
        assert!(matches!(err, StoreError::CorruptRow { .. }));
    }

    #[tokio::test]
    async fn reviews_are_listed_newest_first() {
        let store = store().await;
        let now = Utc::now();
        store
            .insert_review(review("bar", 1, 3, now - ChronoDuration::minutes(5)))
            .await
            .unwrap();
        store.insert_review(review("bar", 2, 5, now)).await.unwrap();
        store.insert_review(review("elsewhere", 1, 1, now)).await.unwrap();

        let listed = store.reviews_for_place("bar").await.unwrap();
        let ratings: Vec<i64> = listed.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![5, 3]);
        assert_eq!(listed[0].user_name.as_deref(), Some("user 2"));
    }

    #[tokio::test]
    async fn anonymous_reviews_keep_a_null_author() {
        let store = store().await;
        let mut anonymous = review("bar", 9, 4, Utc::now());
        anonymous.user_name = None;
        store.insert_review(anonymous).await.unwrap();

        let listed = store.reviews_for_place("bar").await.unwrap();
        assert_eq!(listed[0].user_name, None);
        let value = serde_json::to_value(&listed[0]).unwrap();
        assert!(value["userName"].is_null());
        assert!(value.get("userName").is_some());
    }

    #[tokio::test]
    async fn only_the_author_can_delete_a_review() {
        let store = store().await;
        let written = store.insert_review(review("bar", 1, 4, Utc::now())).await.unwrap();

        assert!(!store.delete_review(written.id, 2).await.unwrap());
        assert!(store.delete_review(written.id, 1).await.unwrap());
        assert!(store.reviews_for_place("bar").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rating_summary_averages_reviews() {
        let store = store().await;
        assert!(store.rating_summary("bar").await.unwrap().is_none());

        for (user, rating) in [(1, 5), (2, 4), (3, 3)] {
            store
                .insert_review(review("bar", user, rating, Utc::now()))
                .await
                .unwrap();
        }

        let summary = store.rating_summary("bar").await.unwrap().unwrap();
        assert_eq!(summary.count, 3);
        assert!((summary.average - 4.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn ping_succeeds_on_open_pool() {
        store().await.ping().await.unwrap();
    }
}
