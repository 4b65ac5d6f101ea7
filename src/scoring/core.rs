// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The numbers behind search ranking.
//!
//! Downloads decide order. Everything else in this file is either a
//! qualification weight (author/maintainer points), a display score (the title
//! bonus), or a display bucket (tiers and rank estimates). None of it can move
//! a package past one with more downloads.
//!
//! # Constants
//!
//! | Constant | Value | Used for |
//! |----------|-------|----------|
//! | `AUTHOR_FIELD_SCORE` | 15 | author phrase match |
//! | `MAINTAINER_FIELD_SCORE` | 12 | maintainer phrase match |
//! | `TITLE_BONUS_RATE` | 0.1 | title match bonus as a share of downloads |
//! | `TITLE_BONUS_CAP` | 50 000 | upper bound on that bonus |
//! | `TITLE_ONLY_SCORE` | 1000 | title match with no download data |
//! | tiers | 100k / 10k / 1k | popular / moderate / small / niche |
//!
//! These are product tuning values. They are collected in `ScoringWeights` so
//! they can be adjusted without touching the matching code; the defaults must
//! stay equal to the table above for output parity with the dashboard.

use crate::types::PopularityTier;
use serde::{Deserialize, Serialize};

// =============================================================================
// SCORING CONSTANTS
// =============================================================================

/// Points for a phrase match in the author field.
pub const AUTHOR_FIELD_SCORE: f64 = 15.0;

/// Points for a phrase match in the maintainer field.
pub const MAINTAINER_FIELD_SCORE: f64 = 12.0;

/// Title matches earn this share of the package's downloads as a bonus.
pub const TITLE_BONUS_RATE: f64 = 0.1;

/// Maximum title bonus.
pub const TITLE_BONUS_CAP: f64 = 50_000.0;

/// Score for a title match on a package with no download data.
pub const TITLE_ONLY_SCORE: f64 = 1000.0;

/// Downloads at or above this are `popular`.
pub const POPULAR_THRESHOLD: u64 = 100_000;

/// Downloads at or above this are `moderate`.
pub const MODERATE_THRESHOLD: u64 = 10_000;

/// Downloads at or above this are `small`. Anything less is `niche`.
pub const SMALL_THRESHOLD: u64 = 1_000;

/// Approximate size of CRAN, used as the denominator of rank estimates.
pub const ESTIMATED_TOTAL_PACKAGES: u32 = 22_000;

/// Tunable weights. `Default` reproduces the constants above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub author_field: f64,
    pub maintainer_field: f64,
    pub title_bonus_rate: f64,
    pub title_bonus_cap: f64,
    pub title_only_score: f64,
    pub popular_threshold: u64,
    pub moderate_threshold: u64,
    pub small_threshold: u64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            author_field: AUTHOR_FIELD_SCORE,
            maintainer_field: MAINTAINER_FIELD_SCORE,
            title_bonus_rate: TITLE_BONUS_RATE,
            title_bonus_cap: TITLE_BONUS_CAP,
            title_only_score: TITLE_ONLY_SCORE,
            popular_threshold: POPULAR_THRESHOLD,
            moderate_threshold: MODERATE_THRESHOLD,
            small_threshold: SMALL_THRESHOLD,
        }
    }
}

impl ScoringWeights {
    /// Bucket annual downloads into a display tier.
    pub fn tier(&self, yearly_downloads: u64) -> PopularityTier {
        if yearly_downloads >= self.popular_threshold {
            PopularityTier::Popular
        } else if yearly_downloads >= self.moderate_threshold {
            PopularityTier::Moderate
        } else if yearly_downloads >= self.small_threshold {
            PopularityTier::Small
        } else {
            PopularityTier::Niche
        }
    }

    /// Keyword relevance score for a package.
    ///
    /// Downloads, plus a capped bonus when the title matched. A title match on
    /// a package without download data gets a flat score so it still reads as
    /// relevant in the UI.
    pub fn keyword_score(&self, popularity: u64, title_match: bool) -> f64 {
        let downloads = popularity as f64;
        match (title_match, popularity) {
            (true, 0) => self.title_only_score,
            (true, _) => downloads + (downloads * self.title_bonus_rate).min(self.title_bonus_cap),
            (false, _) => downloads,
        }
    }
}

/// Tier with the default thresholds.
pub fn popularity_tier(yearly_downloads: u64) -> PopularityTier {
    ScoringWeights::default().tier(yearly_downloads)
}

/// A rank/percentile guess derived from annual downloads alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEstimate {
    pub rank: Option<u32>,
    pub percentile: Option<f64>,
    pub total_packages: u32,
    pub downloads: u64,
    pub estimated: bool,
}

/// (minimum downloads, percentile, rank), descending by downloads.
const RANK_TABLE: [(u64, f64, u32); 14] = [
    (10_000_000, 99.8, 50),
    (5_000_000, 99.5, 100),
    (2_000_000, 99.0, 200),
    (1_000_000, 97.5, 500),
    (500_000, 95.0, 1_000),
    (200_000, 90.0, 2_000),
    (100_000, 80.0, 4_000),
    (50_000, 70.0, 6_000),
    (20_000, 60.0, 8_000),
    (10_000, 50.0, 11_000),
    (5_000, 40.0, 13_000),
    (2_000, 30.0, 15_000),
    (1_000, 20.0, 17_000),
    (500, 10.0, 19_000),
];

/// Percentile and rank bucket for a download count.
///
/// Zero downloads means "no data", so both fields are `None` rather than the
/// bottom bucket.
pub fn estimate_rank(downloads: u64) -> RankEstimate {
    let (percentile, rank) = if downloads == 0 {
        (None, None)
    } else {
        RANK_TABLE
            .iter()
            .find(|(min, _, _)| downloads >= *min)
            .map(|&(_, pct, rank)| (Some(pct), Some(rank)))
            .unwrap_or((Some(5.0), Some(21_000)))
    };
    RankEstimate {
        rank,
        percentile,
        total_packages: ESTIMATED_TOTAL_PACKAGES,
        downloads,
        estimated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds_are_inclusive() {
        assert_eq!(popularity_tier(100_000), PopularityTier::Popular);
        assert_eq!(popularity_tier(99_999), PopularityTier::Moderate);
        assert_eq!(popularity_tier(10_000), PopularityTier::Moderate);
        assert_eq!(popularity_tier(9_999), PopularityTier::Small);
        assert_eq!(popularity_tier(1_000), PopularityTier::Small);
        assert_eq!(popularity_tier(999), PopularityTier::Niche);
        assert_eq!(popularity_tier(0), PopularityTier::Niche);
    }

    #[test]
    fn test_title_bonus_is_ten_percent() {
        let w = ScoringWeights::default();
        assert_eq!(w.keyword_score(100, true), 110.0);
        assert_eq!(w.keyword_score(100, false), 100.0);
    }

    #[test]
    fn test_title_bonus_caps_at_fifty_thousand() {
        let w = ScoringWeights::default();
        assert_eq!(w.keyword_score(2_000_000, true), 2_050_000.0);
        // Exactly at the cap boundary
        assert_eq!(w.keyword_score(500_000, true), 550_000.0);
    }

    #[test]
    fn test_title_match_without_downloads_gets_flat_score() {
        let w = ScoringWeights::default();
        assert_eq!(w.keyword_score(0, true), 1000.0);
        assert_eq!(w.keyword_score(0, false), 0.0);
    }

    #[test]
    fn test_estimate_rank_buckets() {
        let top = estimate_rank(12_000_000);
        assert_eq!(top.rank, Some(50));
        assert_eq!(top.percentile, Some(99.8));

        let mid = estimate_rank(10_000);
        assert_eq!(mid.rank, Some(11_000));
        assert_eq!(mid.percentile, Some(50.0));

        let tail = estimate_rank(12);
        assert_eq!(tail.rank, Some(21_000));
        assert_eq!(tail.percentile, Some(5.0));
    }

    #[test]
    fn test_estimate_rank_without_data() {
        let none = estimate_rank(0);
        assert_eq!(none.rank, None);
        assert_eq!(none.percentile, None);
        assert_eq!(none.total_packages, ESTIMATED_TOTAL_PACKAGES);
        assert!(none.estimated);
    }

    #[test]
    fn test_rank_table_is_descending() {
        for pair in RANK_TABLE.windows(2) {
            assert!(pair[0].0 > pair[1].0);
            assert!(pair[0].2 < pair[1].2);
        }
    }
}
