// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Top packages within a category tag, ranked by downloads.

use crate::index::PackageIndex;
use crate::popularity::PopularityLookup;
use crate::scoring::ranking::compare_by_popularity;
use crate::types::PopularityTier;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY_LIMIT: usize = 50;

/// Result cap for the `software` category.
pub const SOFTWARE_CATEGORY_CAP: usize = 75;

/// Result cap for every other category.
pub const CATEGORY_CAP: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    pub package: String,
    pub title: String,
    pub description: String,
    pub maintainer: String,
    pub category_tags: Vec<String>,
    pub total_downloads: u64,
    pub popularity_tier: PopularityTier,
    /// 1-based position in the ranked list.
    pub download_rank: usize,
}

/// Largest result list allowed for `category`.
pub fn category_cap(category: &str) -> usize {
    if category.eq_ignore_ascii_case("software") {
        SOFTWARE_CATEGORY_CAP
    } else {
        CATEGORY_CAP
    }
}

/// Packages tagged `category` with at least one download, most downloaded
/// first.
pub async fn rank_category(
    index: &PackageIndex,
    popularity: &dyn PopularityLookup,
    category: &str,
    limit: usize,
) -> Vec<CategoryEntry> {
    let members: Vec<_> = index.all().filter(|r| r.has_tag(category)).collect();
    let names: Vec<String> = members.iter().map(|r| r.name.clone()).collect();
    let downloads = popularity.downloads_of(&names).await;

    let mut ranked: Vec<_> = members
        .into_iter()
        .zip(downloads)
        .filter(|(_, d)| *d > 0)
        .collect();
    ranked.sort_by(|(a, da), (b, db)| compare_by_popularity(*da, &a.name, *db, &b.name));

    ranked
        .into_iter()
        .take(limit.min(category_cap(category)))
        .enumerate()
        .map(|(i, (record, total_downloads))| CategoryEntry {
            package: record.name.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            maintainer: record.maintainer.clone(),
            category_tags: record.category_tags.clone(),
            total_downloads,
            popularity_tier: popularity.tier(total_downloads),
            download_rank: i + 1,
        })
        .collect()
}
