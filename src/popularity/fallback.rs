// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Last-resort annual download figures for well-known packages.
//!
//! Only consulted when both live lookups fail. Everything not listed is 0.

const STATIC_POPULARITY: [(&str, u64); 19] = [
    ("ggplot2", 900_000),
    ("dplyr", 800_000),
    ("tidyverse", 700_000),
    ("data.table", 600_000),
    ("ts", 500_000),
    ("shiny", 500_000),
    ("forecast", 400_000),
    ("knitr", 400_000),
    ("zoo", 350_000),
    ("rmarkdown", 350_000),
    ("xts", 300_000),
    ("magrittr", 300_000),
    ("devtools", 300_000),
    ("lubridate", 250_000),
    ("plyr", 200_000),
    ("stringr", 180_000),
    ("plotly", 180_000),
    ("readr", 160_000),
    ("reshape2", 150_000),
];

/// Static estimate for `package`, or 0.
pub fn static_popularity(package: &str) -> u64 {
    STATIC_POPULARITY
        .iter()
        .find(|(name, _)| *name == package)
        .map(|&(_, downloads)| downloads)
        .unwrap_or(0)
}
