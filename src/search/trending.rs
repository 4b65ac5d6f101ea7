// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Trending packages: download growth over the last three months compared
//! with the three months before.
//!
//! A package trends when the earlier period had downloads, the recent period
//! has more than 1000, and growth is above 5%. Packages whose lookups fail
//! are skipped.

use crate::popularity::{total_downloads, DateWindow, DownloadSource};
use crate::scoring::ranking::compare_names;
use chrono::{Months, NaiveDate};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TRENDING_LIMIT: usize = 10;

const PERIOD_MONTHS: u32 = 3;
const MIN_RECENT_DOWNLOADS: u64 = 1_000;
const MIN_GROWTH_PERCENT: f64 = 5.0;
const PERIOD_LABEL: &str = "Last 3 months vs previous 3 months";

/// Packages checked for growth: widely used CRAN packages plus newer
/// tooling that tends to move.
pub const TRENDING_CANDIDATES: [&str; 63] = [
    "ggplot2", "dplyr", "tidyverse", "shiny", "data.table", "plotly", "knitr", "rmarkdown",
    "lubridate", "stringr", "readr", "tidyr", "purrr", "devtools", "httr", "jsonlite",
    "forecast", "xts", "zoo", "caret", "randomForest", "leaflet", "DT", "flexdashboard",
    "reticulate", "targets", "pins", "plumber", "golem", "rhino", "bslib", "thematic",
    "gganimate", "rayshader", "gt", "reactable", "distill", "pkgdown", "usethis",
    "testthat", "covr", "lintr", "styler", "renv", "pak", "remotes", "desc",
    "fs", "glue", "cli", "crayon", "progress", "logger", "config", "here",
    "torch", "luz", "tabnet", "vetiver", "tidymodels", "parsnip", "recipes", "workflows",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingEntry {
    pub package: String,
    pub recent_downloads: u64,
    pub previous_downloads: u64,
    /// Percent, one decimal place.
    pub growth_rate: f64,
    pub growth_amount: i64,
    pub period: String,
}

/// The (previous, recent) periods ending at `today`.
pub fn trend_windows(today: NaiveDate) -> (DateWindow, DateWindow) {
    let months = Months::new(PERIOD_MONTHS);
    let split = today.checked_sub_months(months).unwrap_or(today);
    let start = split.checked_sub_months(months).unwrap_or(split);
    (
        DateWindow { start, end: split },
        DateWindow { start: split, end: today },
    )
}

/// Growth in percent if the pair qualifies as trending.
pub fn growth_rate(previous: u64, recent: u64) -> Option<f64> {
    if previous == 0 || recent <= MIN_RECENT_DOWNLOADS {
        return None;
    }
    let rate = (recent as f64 - previous as f64) / previous as f64 * 100.0;
    (rate > MIN_GROWTH_PERCENT).then(|| (rate * 10.0).round() / 10.0)
}

/// The fastest-growing `candidates`, at most `limit` of them.
pub async fn trending_packages(
    source: &dyn DownloadSource,
    candidates: &[String],
    today: NaiveDate,
    timeout: Duration,
    concurrency: usize,
    limit: usize,
) -> Vec<TrendingEntry> {
    let (previous_window, recent_window) = trend_windows(today);

    let mut entries: Vec<TrendingEntry> = stream::iter(candidates.iter().cloned())
        .map(move |package| async move {
            let (recent, previous) = futures::join!(
                source.daily_downloads(&package, recent_window, timeout),
                source.daily_downloads(&package, previous_window, timeout),
            );
            let (recent, previous) = match (recent, previous) {
                (Ok(r), Ok(p)) => (total_downloads(&r), total_downloads(&p)),
                (Err(e), _) | (_, Err(e)) => {
                    debug!(package = %package, error = %e, "skipping package for trends");
                    return None;
                }
            };
            growth_rate(previous, recent).map(|growth_rate| TrendingEntry {
                growth_amount: recent as i64 - previous as i64,
                package,
                recent_downloads: recent,
                previous_downloads: previous,
                growth_rate,
                period: PERIOD_LABEL.to_string(),
            })
        })
        .buffered(concurrency.max(1))
        .filter_map(|entry| async move { entry })
        .collect()
        .await;

    entries.sort_by(|a, b| {
        b.growth_rate
            .total_cmp(&a.growth_rate)
            .then_with(|| compare_names(&a.package, &b.package))
    });
    entries.truncate(limit);
    entries
}
