// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Bioconductor download statistics.
//!
//! cranlogs only counts CRAN mirrors, so Bioconductor packages would all
//! rank at zero through the oracle. Bioconductor publishes monthly counts
//! instead; a stats snapshot holds them per package:
//!
//! ```text
//! {
//!   "lastUpdated": "2025-02-27T04:00:00Z",
//!   "packages": {
//!     "limma": { "downloads": [ { "year": 2025, "month": "Jan", "downloads": 51234, "distinctIPs": 20310 } ] }
//!   }
//! }
//! ```
//!
//! A package's figure is the sum over the current and previous calendar
//! years. Packages absent from the snapshot are looked up through the
//! oracle as usual.

use super::{PopularityLookup, PopularityOracle};
use crate::error::{Error, Result};
use crate::types::PopularityTier;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// One month of Bioconductor downloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyDownloads {
    pub year: i32,
    /// Three-letter month name, as published (`Jan`..`Dec`).
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default, rename = "distinctIPs")]
    pub distinct_ips: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsFile {
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    packages: HashMap<String, StatsPackage>,
}

#[derive(Deserialize)]
struct StatsPackage {
    #[serde(default)]
    downloads: Vec<MonthlyDownloads>,
}

#[derive(Debug, Clone, Default)]
pub struct BiocStats {
    packages: HashMap<String, Vec<MonthlyDownloads>>,
    last_updated: Option<String>,
}

impl BiocStats {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| Error::snapshot(path, e))?;
        let stats = Self::parse(&json).map_err(|e| Error::snapshot(path, e))?;
        info!(
            path = %path.display(),
            packages = stats.len(),
            last_updated = stats.last_updated().unwrap_or("unknown"),
            "loaded Bioconductor download statistics"
        );
        Ok(stats)
    }

    pub fn parse(json: &str) -> serde_json::Result<Self> {
        let file: StatsFile = serde_json::from_str(json)?;
        Ok(Self {
            packages: file
                .packages
                .into_iter()
                .map(|(name, p)| (name, p.downloads))
                .collect(),
            last_updated: file.last_updated,
        })
    }

    pub fn from_packages(
        packages: impl IntoIterator<Item = (String, Vec<MonthlyDownloads>)>,
    ) -> Self {
        Self {
            packages: packages.into_iter().collect(),
            last_updated: None,
        }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn contains(&self, package: &str) -> bool {
        self.packages.contains_key(package)
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    /// Downloads over the calendar year of `today` and the one before it,
    /// or `None` for a package the snapshot does not cover.
    pub fn recent_total(&self, package: &str, today: NaiveDate) -> Option<u64> {
        let year = today.year();
        self.packages.get(package).map(|months| {
            months
                .iter()
                .filter(|m| m.year == year || m.year == year - 1)
                .map(|m| m.downloads)
                .sum()
        })
    }
}

/// Browse-view popularity: Bioconductor statistics where they exist, the
/// oracle for everything else.
pub struct BiocPopularity {
    stats: Arc<BiocStats>,
    oracle: Arc<PopularityOracle>,
}

impl BiocPopularity {
    pub fn new(stats: Arc<BiocStats>, oracle: Arc<PopularityOracle>) -> Self {
        Self { stats, oracle }
    }
}

#[async_trait]
impl PopularityLookup for BiocPopularity {
    async fn downloads_of(&self, names: &[String]) -> Vec<u64> {
        let today = self.oracle.today();
        let mut totals: Vec<Option<u64>> = names
            .iter()
            .map(|n| self.stats.recent_total(n, today))
            .collect();

        let missing: Vec<String> = names
            .iter()
            .zip(&totals)
            .filter(|(_, t)| t.is_none())
            .map(|(n, _)| n.clone())
            .collect();
        let mut looked_up = self.oracle.scores_of(&missing).await.into_iter();

        for total in totals.iter_mut().filter(|t| t.is_none()) {
            *total = looked_up.next();
        }
        totals.into_iter().map(Option::unwrap_or_default).collect()
    }

    fn tier(&self, downloads: u64) -> PopularityTier {
        self.oracle.weights().tier(downloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{oracle_with, test_today};

    fn month(year: i32, month: &str, downloads: u64) -> MonthlyDownloads {
        MonthlyDownloads {
            year,
            month: month.to_string(),
            downloads,
            distinct_ips: downloads / 2,
        }
    }

    #[test]
    fn test_parse_stats_file() {
        let stats = BiocStats::parse(
            r#"{
                "lastUpdated": "2025-02-27",
                "packages": {
                    "limma": {
                        "package": "limma",
                        "downloads": [
                            {"year": 2025, "month": "Jan", "period": "2025-Jan", "downloads": 10, "distinctIPs": 4}
                        ],
                        "total": {"downloads": 10, "distinctIPs": 4}
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.last_updated(), Some("2025-02-27"));
        assert_eq!(stats.recent_total("limma", test_today()), Some(10));
    }

    #[test]
    fn test_recent_total_covers_two_calendar_years() {
        let stats = BiocStats::from_packages([(
            "limma".to_string(),
            vec![
                month(2023, "Dec", 1_000_000),
                month(2024, "Jan", 300),
                month(2024, "Dec", 200),
                month(2025, "Feb", 100),
            ],
        )]);
        // today is 2025-03-01
        assert_eq!(stats.recent_total("limma", test_today()), Some(600));
        assert_eq!(stats.recent_total("edgeR", test_today()), None);
    }

    #[tokio::test]
    async fn test_stats_first_then_oracle() {
        let stats = Arc::new(BiocStats::from_packages([
            ("limma".to_string(), vec![month(2025, "Jan", 5_000)]),
            ("edgeR".to_string(), vec![month(2020, "Jan", 9_000)]),
        ]));
        let oracle = oracle_with(&[("limma", 1), ("zoo", 350_000)]);
        let popularity = BiocPopularity::new(stats, oracle);

        let names: Vec<String> = ["zoo", "limma", "edgeR", "unknown"]
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(popularity.downloads_of(&names).await, vec![350_000, 5_000, 0, 0]);
        assert_eq!(popularity.tier(5_000), PopularityTier::Small);
    }
}
