// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The package index: every known package, loaded once at startup.
//!
//! # Invariants
//!
//! - Names are unique. The first record for a name wins; later duplicates are
//!   dropped with a warning.
//! - `all()` yields records in ascending byte order of name, the same order on
//!   every call.
//! - Read-only after construction. Share it behind an `Arc`.

pub mod snapshot;

use crate::error::{Error, Result};
use crate::types::PackageRecord;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Used when no snapshot can be loaded, so the service still answers.
pub const FALLBACK_PACKAGES: [&str; 25] = [
    "ggplot2",
    "dplyr",
    "shiny",
    "tidyverse",
    "devtools",
    "knitr",
    "rmarkdown",
    "plotly",
    "DT",
    "lubridate",
    "stringr",
    "readr",
    "tidyr",
    "purrr",
    "data.table",
    "magrittr",
    "httr",
    "jsonlite",
    "xml2",
    "rvest",
    "caret",
    "randomForest",
    "forecast",
    "leaflet",
    "sf",
];

#[derive(Debug, Clone, Default)]
pub struct PackageIndex {
    /// Sorted by name.
    records: Vec<PackageRecord>,
    by_name: HashMap<String, usize>,
    last_updated: Option<String>,
    is_fallback: bool,
}

impl PackageIndex {
    /// Load a snapshot file in either supported shape.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| Error::snapshot(path, e))?;
        let snapshot = snapshot::parse(&json).map_err(|e| Error::snapshot(path, e))?;

        let mut index = Self::from_records(snapshot.records);
        index.last_updated = snapshot.last_updated;
        info!(
            path = %path.display(),
            packages = index.len(),
            last_updated = index.last_updated.as_deref().unwrap_or("unknown"),
            "loaded package snapshot"
        );
        Ok(index)
    }

    /// `load`, or the built-in fallback list when that fails.
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(index) => index,
            Err(err) => {
                warn!(error = %err, "snapshot unavailable, serving fallback package list");
                Self::fallback()
            }
        }
    }

    /// The 25 well-known CRAN packages, names only.
    pub fn fallback() -> Self {
        let mut index = Self::from_records(FALLBACK_PACKAGES.iter().map(|n| PackageRecord::bare(*n)));
        index.is_fallback = true;
        index
    }

    pub fn from_records(records: impl IntoIterator<Item = PackageRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for record in records {
            if !seen.insert(record.name.clone()) {
                warn!(package = %record.name, "duplicate package in snapshot, keeping first");
                continue;
            }
            unique.push(record);
        }
        unique.sort_by(|a, b| a.name.cmp(&b.name));

        let by_name = unique
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();

        Self {
            records: unique,
            by_name,
            last_updated: None,
            is_fallback: false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.by_name.get(name).map(|&i| &self.records[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Every record, sorted by name. Each call starts a fresh pass.
    pub fn all(&self) -> impl Iterator<Item = &PackageRecord> + '_ {
        self.records.iter()
    }

    /// The backing slice, for parallel scans.
    pub fn as_slice(&self) -> &[PackageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }
}
