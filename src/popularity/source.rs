// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Where download counts come from.
//!
//! `DownloadSource` is the seam between the oracle and the network. The
//! production implementation talks to cranlogs; tests and `--offline` runs
//! use fakes that never touch a socket.

use crate::error::SourceError;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// An inclusive range of whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// The `days` days before `today`, ending yesterday.
    ///
    /// Today's counts are partial, so they are never included.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let days = i64::from(days.max(1));
        Self {
            start: today - ChronoDuration::days(days),
            end: today - ChronoDuration::days(1),
        }
    }

    /// Number of days covered, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start.format("%Y-%m-%d"), self.end.format("%Y-%m-%d"))
    }
}

/// One day of a download series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDownloads {
    #[serde(default)]
    pub day: String,
    pub downloads: u64,
}

/// Sum of a series.
pub fn total_downloads(series: &[DailyDownloads]) -> u64 {
    series.iter().map(|d| d.downloads).sum()
}

#[async_trait]
pub trait DownloadSource: Send + Sync {
    /// Daily downloads for `package` over `window`.
    ///
    /// An empty series is a valid answer (package exists, nobody downloaded
    /// it, or the source has no record of it).
    async fn daily_downloads(
        &self,
        package: &str,
        window: DateWindow,
        timeout: Duration,
    ) -> Result<Vec<DailyDownloads>, SourceError>;
}

// =============================================================================
// CRANLOGS
// =============================================================================

/// The cranlogs API answers with a list of series for multi-package queries
/// and sometimes a bare object for single packages.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum CranlogsResponse {
    Many(Vec<CranlogsSeries>),
    One(CranlogsSeries),
}

#[derive(Deserialize, Debug, Default)]
struct CranlogsSeries {
    #[serde(default)]
    downloads: Vec<DailyDownloads>,
}

impl From<CranlogsResponse> for Vec<DailyDownloads> {
    fn from(resp: CranlogsResponse) -> Self {
        match resp {
            CranlogsResponse::Many(series) => series
                .into_iter()
                .next()
                .map(|s| s.downloads)
                .unwrap_or_default(),
            CranlogsResponse::One(series) => series.downloads,
        }
    }
}

/// Parse a cranlogs body into one canonical series.
pub fn parse_cranlogs(package: &str, body: &str) -> Result<Vec<DailyDownloads>, SourceError> {
    serde_json::from_str::<CranlogsResponse>(body)
        .map(Vec::from)
        .map_err(|e| SourceError::Decode {
            package: package.to_string(),
            message: e.to_string(),
        })
}

#[derive(Debug, Clone)]
pub struct CranlogsSource {
    base_url: String,
    client: reqwest::Client,
}

impl CranlogsSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cranscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn url_for(&self, package: &str, window: DateWindow) -> String {
        format!("{}/downloads/daily/{}/{}", self.base_url, window, package)
    }
}

#[async_trait]
impl DownloadSource for CranlogsSource {
    async fn daily_downloads(
        &self,
        package: &str,
        window: DateWindow,
        timeout: Duration,
    ) -> Result<Vec<DailyDownloads>, SourceError> {
        let url = self.url_for(package, window);
        let resp = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(package, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                package: package.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::from_reqwest(package, e))?;
        parse_cranlogs(package, &body)
    }
}

/// A source that always fails. Used for offline runs, where every lookup
/// goes straight to the static table.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSource;

#[async_trait]
impl DownloadSource for UnavailableSource {
    async fn daily_downloads(
        &self,
        _package: &str,
        _window: DateWindow,
        _timeout: Duration,
    ) -> Result<Vec<DailyDownloads>, SourceError> {
        Err(SourceError::Unavailable)
    }
}
