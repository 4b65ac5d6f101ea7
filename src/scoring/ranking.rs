// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: how packages get sorted.
//!
//! Downloads descending, then package name ascending. The relevance score is
//! never consulted, so a title-match bonus cannot lift a package above one
//! with more downloads. Names compare case-insensitively, the way the
//! dashboard lists them (`aTSA` before `DESeq2`), with byte order as the
//! final key so the order stays total and identical on every run.

use crate::types::RankedPackage;
use std::cmp::Ordering;

/// Compare two ranked packages.
///
/// Sort order:
/// 1. **Popularity** - higher annual downloads first
/// 2. **Name** - ascending, ignoring case, then byte order
///
/// # Example
///
/// ```ignore
/// // 200 downloads without a title match beats 100 downloads with one
/// assert_eq!(compare_ranked(&b, &a), Ordering::Less);
/// ```
pub fn compare_ranked(a: &RankedPackage, b: &RankedPackage) -> Ordering {
    compare_by_popularity(a.popularity, &a.package, b.popularity, &b.package)
}

/// The underlying key comparison, shared with the category and research
/// rankers which sort their own row types.
pub fn compare_by_popularity(
    a_popularity: u64,
    a_name: &str,
    b_popularity: u64,
    b_name: &str,
) -> Ordering {
    // INVARIANT: POPULARITY_DOMINANCE
    // Score must never appear here. Order is downloads, then name.
    b_popularity
        .cmp(&a_popularity)
        .then_with(|| compare_names(a_name, b_name))
}

/// Package names in listing order: case-insensitive, byte order on ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Sort a result list in place with `compare_ranked`.
pub fn sort_ranked(results: &mut [RankedPackage]) {
    results.sort_by(compare_ranked);
}
