// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Package-name autocomplete.

use crate::index::PackageIndex;
use crate::scoring::ranking::compare_names;
use std::cmp::Ordering;

pub const DEFAULT_NAME_LIMIT: usize = 10;

/// Names containing `query` (case-insensitive), prefix matches first, then
/// alphabetical ignoring case.
pub fn suggest_names(index: &PackageIndex, query: &str, limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < 2 || limit == 0 {
        return Vec::new();
    }

    let mut hits: Vec<(bool, &str)> = index
        .all()
        .filter_map(|r| {
            let lower = r.name.to_lowercase();
            lower
                .contains(&needle)
                .then(|| (lower.starts_with(&needle), r.name.as_str()))
        })
        .collect();

    hits.sort_by(|a, b| match (a.0, b.0) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare_names(a.1, b.1),
    });

    hits.into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}
