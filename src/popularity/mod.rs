// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Popularity oracle: package name to annual downloads.
//!
//! Lookups never fail. Each one walks a fixed chain and stops at the first
//! step that produces a number:
//!
//! ```text
//! cache ──hit──> value
//!   │ miss
//!   ▼
//! primary: trailing 365 days, summed ──ok──> cache for popularity_ttl
//!   │ error
//!   ▼
//! fallback: trailing 30 days × 12 ──ok──> cache for fallback_ttl
//!   │ error
//!   ▼
//! static table, default 0 (not cached)
//! ```
//!
//! The static answer is deliberately left out of the cache so a source that
//! comes back is picked up on the next request instead of after a TTL.

pub mod bioc;
pub mod fallback;
pub mod source;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::scoring::ScoringWeights;
use crate::types::{PopularityScore, PopularityTier};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub use bioc::{BiocPopularity, BiocStats, MonthlyDownloads};
pub use fallback::static_popularity;
pub use source::{
    total_downloads, CranlogsSource, DailyDownloads, DateWindow, DownloadSource, UnavailableSource,
};

/// Windows, timeouts and TTLs for the lookup chain.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleSettings {
    pub primary_window_days: u32,
    pub fallback_window_days: u32,
    pub fallback_multiplier: u64,
    pub primary_timeout: Duration,
    pub fallback_timeout: Duration,
    pub popularity_ttl: Duration,
    pub fallback_ttl: Duration,
    pub concurrency: usize,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for OracleSettings {
    fn from(c: &Config) -> Self {
        Self {
            primary_window_days: c.primary_window_days,
            fallback_window_days: c.fallback_window_days,
            fallback_multiplier: c.fallback_multiplier,
            primary_timeout: c.primary_timeout(),
            fallback_timeout: c.fallback_timeout(),
            popularity_ttl: c.popularity_ttl(),
            fallback_ttl: c.fallback_ttl(),
            concurrency: c.enrichment_concurrency.max(1),
        }
    }
}

pub struct PopularityOracle {
    source: Arc<dyn DownloadSource>,
    cache: Arc<TtlCache<String, u64>>,
    settings: OracleSettings,
    weights: ScoringWeights,
    /// Pinned date for reproducible windows; `None` means the UTC clock.
    today: Option<NaiveDate>,
}

impl PopularityOracle {
    pub fn new(
        source: Arc<dyn DownloadSource>,
        cache: Arc<TtlCache<String, u64>>,
        settings: OracleSettings,
    ) -> Self {
        Self {
            source,
            cache,
            settings,
            weights: ScoringWeights::default(),
            today: None,
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn cache(&self) -> &Arc<TtlCache<String, u64>> {
        &self.cache
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn source(&self) -> &Arc<dyn DownloadSource> {
        &self.source
    }

    pub fn settings(&self) -> &OracleSettings {
        &self.settings
    }

    /// The pinned date, or today in UTC.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Annual downloads for `package`.
    pub async fn score_of(&self, package: &str) -> u64 {
        if let Some(hit) = self.cache.get(&package.to_string()) {
            return hit;
        }

        let today = self.today();
        let s = &self.settings;

        let primary = DateWindow::trailing(today, s.primary_window_days);
        let primary_err = match self
            .source
            .daily_downloads(package, primary, s.primary_timeout)
            .await
        {
            Ok(series) => {
                let total = total_downloads(&series);
                self.cache
                    .insert_with_ttl(package.to_string(), total, s.popularity_ttl);
                debug!(package, downloads = total, "primary popularity lookup");
                return total;
            }
            Err(e) => e,
        };

        let recent = DateWindow::trailing(today, s.fallback_window_days);
        match self
            .source
            .daily_downloads(package, recent, s.fallback_timeout)
            .await
        {
            Ok(series) => {
                let total = total_downloads(&series).saturating_mul(s.fallback_multiplier);
                self.cache
                    .insert_with_ttl(package.to_string(), total, s.fallback_ttl);
                warn!(package, error = %primary_err, downloads = total, "yearly lookup failed, using annualised recent downloads");
                total
            }
            Err(e) => {
                let total = static_popularity(package);
                warn!(package, error = %e, downloads = total, "download source unavailable, using static popularity");
                total
            }
        }
    }

    /// Annual downloads for every name, in input order.
    ///
    /// At most `concurrency` lookups are in flight; all complete before this
    /// returns.
    pub async fn scores_of<S: AsRef<str>>(&self, names: &[S]) -> Vec<u64> {
        // Owned names keep the stream's future `Send` for axum handlers.
        let owned: Vec<String> = names.iter().map(|n| n.as_ref().to_owned()).collect();
        stream::iter(owned)
            .map(|name| async move { self.score_of(&name).await })
            .buffered(self.settings.concurrency)
            .collect()
            .await
    }

    pub async fn popularity_of(&self, package: &str) -> PopularityScore {
        let yearly_downloads = self.score_of(package).await;
        self.describe(package, yearly_downloads)
    }

    /// Attach the tier to an already known count.
    pub fn describe(&self, package: &str, yearly_downloads: u64) -> PopularityScore {
        PopularityScore {
            package: package.to_string(),
            yearly_downloads,
            tier: self.weights.tier(yearly_downloads),
        }
    }
}

/// Batch download lookups for the browse views (categories, research
/// areas), which may rank from a different source than search does.
#[async_trait]
pub trait PopularityLookup: Send + Sync {
    /// Annual downloads for every name, in input order.
    async fn downloads_of(&self, names: &[String]) -> Vec<u64>;

    fn tier(&self, downloads: u64) -> PopularityTier;
}

#[async_trait]
impl PopularityLookup for PopularityOracle {
    async fn downloads_of(&self, names: &[String]) -> Vec<u64> {
        self.scores_of(names).await
    }

    fn tier(&self, downloads: u64) -> PopularityTier {
        self.weights.tier(downloads)
    }
}
