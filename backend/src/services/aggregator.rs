//! Read-side projection of crowd verification votes.
//!
//! Tallies are computed from the stored votes on every request; nothing is
//! cached, so a stats read always reflects every vote committed before it
//! began. Callers get an explicit `StatsOutcome` and decide themselves whether
//! "no votes yet" and "store unreachable" should look the same.

use serde::{de, Deserialize, Deserializer, Serialize};
use storage::{VerificationStore, VoteGroup};
use tracing::warn;

use crate::database::Database;
use crate::utils::PlaceId;

/// Vote tallies for one place. `total == verified + unverified` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    /// Votes saying the place serves piña coladas.
    pub verified: u64,
    /// Votes saying it does not.
    pub unverified: u64,
    pub total: u64,
}

impl AggregateStats {
    pub fn new(verified: u64, unverified: u64) -> Self {
        Self {
            verified,
            unverified,
            total: verified + unverified,
        }
    }

    /// Folds grouped counts from the store. A value with no group counts as
    /// zero.
    pub fn from_groups(groups: &[VoteGroup]) -> Self {
        let (verified, unverified) = groups.iter().fold((0u64, 0u64), |(yes, no), group| {
            let count = u64::try_from(group.count).unwrap_or(0);
            if group.has_pina_colada {
                (yes + count, no)
            } else {
                (yes, no + count)
            }
        });
        Self::new(verified, unverified)
    }

    /// Rounded share of yes votes, `None` when nobody has voted.
    pub fn percentage(&self) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let pct = (self.verified as f64 / self.total as f64 * 100.0).round();
        Some(pct as u8)
    }
}

#[derive(Deserialize)]
struct RawStats {
    verified: u64,
    unverified: u64,
    total: u64,
}

impl<'de> Deserialize<'de> for AggregateStats {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawStats::deserialize(deserializer)?;
        if raw.verified.checked_add(raw.unverified) != Some(raw.total) {
            return Err(de::Error::custom(format!(
                "total {} does not equal verified {} + unverified {}",
                raw.total, raw.verified, raw.unverified
            )));
        }
        Ok(Self::new(raw.verified, raw.unverified))
    }
}

/// Result of an aggregation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsOutcome {
    Counted(AggregateStats),
    /// The store could not be reached; the cause has already been logged.
    Unavailable,
}

impl StatsOutcome {
    /// Collapses unavailability into zero counts, which is what clients render
    /// as "no verifications yet".
    pub fn or_empty(self) -> AggregateStats {
        match self {
            Self::Counted(stats) => stats,
            Self::Unavailable => AggregateStats::default(),
        }
    }
}

#[derive(Clone)]
pub struct VerificationAggregator {
    db: Database,
}

impl VerificationAggregator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn stats(&self, place_id: &PlaceId) -> StatsOutcome {
        let groups = match self.db.store() {
            Ok(store) => store.count_votes(place_id.as_str()).await,
            Err(err) => Err(err),
        };

        match groups {
            Ok(groups) => StatsOutcome::Counted(AggregateStats::from_groups(&groups)),
            Err(err) => {
                warn!(%place_id, error = %err, "cannot get verification stats");
                StatsOutcome::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storage::{NewVote, SqliteStore};

    fn group(has_pina_colada: bool, count: i64) -> VoteGroup {
        VoteGroup {
            has_pina_colada,
            count,
        }
    }

    #[test]
    fn missing_groups_count_as_zero() {
        assert_eq!(AggregateStats::from_groups(&[]), AggregateStats::new(0, 0));
        assert_eq!(
            AggregateStats::from_groups(&[group(true, 4)]),
            AggregateStats::new(4, 0)
        );
        assert_eq!(
            AggregateStats::from_groups(&[group(false, 2), group(true, 5)]),
            AggregateStats {
                verified: 5,
                unverified: 2,
                total: 7
            }
        );
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(AggregateStats::default().percentage(), None);
        assert_eq!(AggregateStats::new(1, 1).percentage(), Some(50));
        assert_eq!(AggregateStats::new(1, 7).percentage(), Some(13));
        assert_eq!(AggregateStats::new(2, 1).percentage(), Some(67));
    }

    #[test]
    fn inconsistent_totals_are_rejected() {
        let ok: AggregateStats =
            serde_json::from_str(r#"{"verified":2,"unverified":1,"total":3}"#).unwrap();
        assert_eq!(ok, AggregateStats::new(2, 1));

        let bad = serde_json::from_str::<AggregateStats>(r#"{"verified":2,"unverified":1,"total":9}"#);
        assert!(bad.is_err());
    }

    #[tokio::test]
    async fn stats_reflect_stored_votes() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        for (user_id, has_pina_colada) in [(1, true), (2, true), (3, false)] {
            store
                .upsert_vote(NewVote {
                    place_id: "place-A".into(),
                    user_id,
                    has_pina_colada,
                    recorded_at: chrono::Utc::now(),
                })
                .await
                .unwrap();
        }

        let aggregator = VerificationAggregator::new(Database::new(store));
        let place = PlaceId::parse("place-A").unwrap();
        assert_eq!(
            aggregator.stats(&place).await,
            StatsOutcome::Counted(AggregateStats::new(2, 1))
        );

        let never = PlaceId::parse("never-voted-venue").unwrap();
        assert_eq!(
            aggregator.stats(&never).await,
            StatsOutcome::Counted(AggregateStats::default())
        );
    }

    #[tokio::test]
    async fn missing_store_is_unavailable_not_zero() {
        let aggregator = VerificationAggregator::new(Database::unavailable());
        let place = PlaceId::parse("place-A").unwrap();

        let outcome = aggregator.stats(&place).await;
        assert_eq!(outcome, StatsOutcome::Unavailable);
        assert_eq!(outcome.or_empty(), AggregateStats::default());
    }
}
