// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use crate::cache::TtlCache;
use crate::error::SourceError;
use crate::popularity::{DailyDownloads, DateWindow, DownloadSource, OracleSettings, PopularityOracle};
use crate::types::PackageRecord;
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Fixed "today" used by test oracles.
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or_default()
}

/// Create a record with title and description.
///
/// This is the canonical implementation used across all tests.
pub fn make_record(name: &str, title: &str, description: &str) -> PackageRecord {
    PackageRecord {
        name: name.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        ..PackageRecord::default()
    }
}

/// Create a record with author and maintainer fields.
pub fn make_author_record(name: &str, author: &str, maintainer: &str) -> PackageRecord {
    PackageRecord {
        name: name.to_string(),
        title: format!("The {name} package"),
        author: author.to_string(),
        maintainer: maintainer.to_string(),
        ..PackageRecord::default()
    }
}

/// Create a record carrying category tags.
pub fn make_tagged_record(name: &str, title: &str, tags: &[&str]) -> PackageRecord {
    PackageRecord {
        name: name.to_string(),
        title: title.to_string(),
        category_tags: tags.iter().map(|t| t.to_string()).collect(),
        ..PackageRecord::default()
    }
}

/// A scripted `DownloadSource`.
///
/// Long windows (more than 60 days) answer from the yearly table; packages
/// registered with `recent_only` fail the long window and answer short ones.
/// Failing packages fail everything. Packages registered with `trend`
/// answer windows of up to 120 days: the recent count for a window ending
/// on `test_today()`, the previous count otherwise. Anything else returns
/// an empty series.
#[derive(Debug, Default)]
pub struct FixedSource {
    yearly: RwLock<HashMap<String, u64>>,
    recent: HashMap<String, u64>,
    trends: HashMap<String, (u64, u64)>,
    failing: RwLock<HashSet<String>>,
    calls: AtomicUsize,
}

impl FixedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn yearly(self, package: &str, downloads: u64) -> Self {
        self.yearly.write().insert(package.to_string(), downloads);
        self
    }

    pub fn recent_only(mut self, package: &str, downloads: u64) -> Self {
        self.recent.insert(package.to_string(), downloads);
        self
    }

    pub fn trend(mut self, package: &str, previous: u64, recent: u64) -> Self {
        self.trends.insert(package.to_string(), (previous, recent));
        self
    }

    pub fn failing(self, package: &str) -> Self {
        self.failing.write().insert(package.to_string());
        self
    }

    /// Bring a failing package back with a yearly count.
    pub fn recover(&self, package: &str, downloads: u64) {
        self.failing.write().remove(package);
        self.yearly.write().insert(package.to_string(), downloads);
    }

    /// Number of `daily_downloads` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn series(total: u64) -> Vec<DailyDownloads> {
        vec![DailyDownloads {
            day: "2025-01-01".to_string(),
            downloads: total,
        }]
    }
}

#[async_trait]
impl DownloadSource for FixedSource {
    async fn daily_downloads(
        &self,
        package: &str,
        window: DateWindow,
        _timeout: Duration,
    ) -> Result<Vec<DailyDownloads>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.read().contains(package) {
            return Err(SourceError::Unavailable);
        }
        if let Some(&(previous, recent)) = self.trends.get(package) {
            if window.len_days() <= 120 {
                let total = if window.end >= test_today() { recent } else { previous };
                return Ok(Self::series(total));
            }
        }
        if window.len_days() > 60 {
            if let Some(&total) = self.yearly.read().get(package) {
                return Ok(Self::series(total));
            }
            if self.recent.contains_key(package) {
                return Err(SourceError::Timeout {
                    package: package.to_string(),
                });
            }
            return Ok(Vec::new());
        }
        Ok(self
            .recent
            .get(package)
            .map(|&total| Self::series(total))
            .unwrap_or_default())
    }
}

/// An oracle over `source` with a fresh cache and a pinned date.
pub fn make_oracle(source: Arc<dyn DownloadSource>) -> Arc<PopularityOracle> {
    Arc::new(
        PopularityOracle::new(
            source,
            Arc::new(TtlCache::new(Duration::from_secs(3600))),
            OracleSettings::default(),
        )
        .with_today(test_today()),
    )
}

/// An oracle that reports `pairs` as yearly downloads.
pub fn oracle_with(pairs: &[(&str, u64)]) -> Arc<PopularityOracle> {
    let source = pairs
        .iter()
        .fold(FixedSource::new(), |s, (name, downloads)| s.yearly(name, *downloads));
    make_oracle(Arc::new(source))
}
