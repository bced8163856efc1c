//! Threshold classification of crowd verification results.
//!
//! A place is "verified" when enough people have voted and a large enough
//! share of them said yes. The same `VerificationPolicy` drives both the
//! "verified only" filter and the badge shown on every listed bar, so the two
//! can never disagree.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::aggregator::AggregateStats;

#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("minimum sample size must be at least 1")]
    ZeroSamples,

    #[error("minimum ratio must be within [0, 1], got {0}")]
    RatioOutOfRange(f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("minRating must be within [0, 5], got {0}")]
    MinRating(f64),

    #[error("maxPriceLevel must be at most 4, got {got}")]
    MaxPriceLevel { got: u8 },
}

/// Thresholds deciding when crowd votes make a place "verified".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationPolicy {
    min_samples: u32,
    min_ratio: f64,
}

impl VerificationPolicy {
    pub const DEFAULT_MIN_SAMPLES: u32 = 3;
    pub const DEFAULT_MIN_RATIO: f64 = 0.6;

    /// `min_samples` of zero is refused: it is what keeps `classify` from
    /// ever dividing by a zero total.
    pub fn new(min_samples: u32, min_ratio: f64) -> Result<Self, PolicyError> {
        if min_samples == 0 {
            return Err(PolicyError::ZeroSamples);
        }
        if !min_ratio.is_finite() || !(0.0..=1.0).contains(&min_ratio) {
            return Err(PolicyError::RatioOutOfRange(min_ratio));
        }
        Ok(Self {
            min_samples,
            min_ratio,
        })
    }

    pub fn min_samples(&self) -> u32 {
        self.min_samples
    }

    pub fn min_ratio(&self) -> f64 {
        self.min_ratio
    }

    /// Whether `stats` qualify as verified under this policy.
    pub fn classify(&self, stats: &AggregateStats) -> bool {
        // Sample size first: it guarantees total > 0 before the division.
        stats.total >= u64::from(self.min_samples)
            && stats.verified as f64 / stats.total as f64 >= self.min_ratio
    }
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            min_samples: Self::DEFAULT_MIN_SAMPLES,
            min_ratio: Self::DEFAULT_MIN_RATIO,
        }
    }
}

/// A bar as returned by the places provider, optionally joined with its
/// verification stats by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarResult {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub price_level: Option<u8>,
    pub photo_url: Option<String>,
    pub open_now: Option<bool>,
    pub verification_stats: Option<AggregateStats>,
}

/// User-selected criteria for narrowing a result list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarFilter {
    pub min_rating: f64,
    pub max_price_level: u8,
    pub verified_only: bool,
    pub open_now: bool,
}

impl Default for BarFilter {
    fn default() -> Self {
        Self {
            min_rating: 0.0,
            max_price_level: Self::MAX_PRICE_LEVEL,
            verified_only: false,
            open_now: false,
        }
    }
}

/// A bar that passed the filter, with its badge data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedBar {
    #[serde(flatten)]
    pub bar: BarResult,
    pub verified: bool,
    /// Share of yes votes, rounded; `None` until someone has voted.
    pub verification_percentage: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredBars {
    pub bars: Vec<AnnotatedBar>,
    pub shown: usize,
    pub total: usize,
}

impl BarFilter {
    pub const MAX_PRICE_LEVEL: u8 = 4;

    pub fn validate(&self) -> Result<(), FilterError> {
        if !self.min_rating.is_finite() || !(0.0..=5.0).contains(&self.min_rating) {
            return Err(FilterError::MinRating(self.min_rating));
        }
        if self.max_price_level > Self::MAX_PRICE_LEVEL {
            return Err(FilterError::MaxPriceLevel {
                got: self.max_price_level,
            });
        }
        Ok(())
    }

    /// Unknown ratings, price levels and opening hours never exclude a bar.
    pub fn matches(&self, bar: &BarResult, policy: &VerificationPolicy) -> bool {
        if bar.rating.is_some_and(|rating| rating < self.min_rating) {
            return false;
        }
        if bar
            .price_level
            .is_some_and(|level| level > self.max_price_level)
        {
            return false;
        }
        if self.verified_only
            && !bar
                .verification_stats
                .as_ref()
                .is_some_and(|stats| policy.classify(stats))
        {
            return false;
        }
        if self.open_now && bar.open_now == Some(false) {
            return false;
        }
        true
    }

    /// Keeps matching bars in their original order and badges each one.
    pub fn apply(&self, bars: Vec<BarResult>, policy: &VerificationPolicy) -> FilteredBars {
        let total = bars.len();
        let bars: Vec<AnnotatedBar> = bars
            .into_iter()
            .filter(|bar| self.matches(bar, policy))
            .map(|bar| annotate(bar, policy))
            .collect();

        FilteredBars {
            shown: bars.len(),
            total,
            bars,
        }
    }
}

pub fn annotate(bar: BarResult, policy: &VerificationPolicy) -> AnnotatedBar {
    let stats = bar.verification_stats.as_ref();
    AnnotatedBar {
        verified: stats.is_some_and(|stats| policy.classify(stats)),
        verification_percentage: stats.and_then(AggregateStats::percentage),
        bar,
    }
}
