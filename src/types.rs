// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The data that flows through a search.
//!
//! A `PackageRecord` lives in the index for the lifetime of the process. Each
//! request turns records into `ScoredCandidate`s, enriches them with a
//! `PopularityScore`, and hands the sorted `RankedPackage` list to the cursor,
//! which cuts a `SearchResultPage` out of it.
//!
//! # Invariants
//!
//! - **PackageRecord**: `name` is the identity key. The index never holds two
//!   records with the same name.
//!
//! - **SearchResultPage**: `has_more == offset + results.len() < total_results`
//!   and `total_results` is the match count before slicing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Static metadata for one package, as loaded from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Raw `Authors@R`/`Author` field, unparsed.
    #[serde(default)]
    pub author: String,
    /// Raw `Maintainer` field, usually `Name <email>`.
    #[serde(default)]
    pub maintainer: String,
    #[serde(default)]
    pub category_tags: Vec<String>,
}

impl PackageRecord {
    /// A record that only knows its name. Used for the fallback index.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.category_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Coarse popularity bucket for display. Never used for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopularityTier {
    Popular,
    Moderate,
    Small,
    Niche,
}

impl PopularityTier {
    pub fn as_str(self) -> &'static str {
        match self {
            PopularityTier::Popular => "popular",
            PopularityTier::Moderate => "moderate",
            PopularityTier::Small => "small",
            PopularityTier::Niche => "niche",
        }
    }
}

impl fmt::Display for PopularityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Annual downloads for a package plus the derived tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularityScore {
    pub package: String,
    pub yearly_downloads: u64,
    pub tier: PopularityTier,
}

/// Why a package made it into the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchReason {
    #[serde(rename = "title match")]
    Title,
    #[serde(rename = "description match")]
    Description,
    #[serde(rename = "partial match")]
    Partial,
    #[serde(rename = "author match")]
    Author,
    #[serde(rename = "maintainer match")]
    Maintainer,
}

impl MatchReason {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchReason::Title => "title match",
            MatchReason::Description => "description match",
            MatchReason::Partial => "partial match",
            MatchReason::Author => "author match",
            MatchReason::Maintainer => "maintainer match",
        }
    }
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A package that passed an engine's qualification gate, before enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub package: String,
    /// Engine-specific relevance. For authors this is the field score
    /// (15/12); for keywords it is filled in after enrichment.
    pub score: f64,
    pub match_reasons: Vec<MatchReason>,
    pub is_exact_match: bool,
}

impl ScoredCandidate {
    pub fn has_reason(&self, reason: MatchReason) -> bool {
        self.match_reasons.contains(&reason)
    }
}

/// One row of a result page: candidate + popularity + display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPackage {
    pub package: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub maintainer: String,
    pub score: f64,
    pub match_reasons: Vec<MatchReason>,
    pub is_exact_match: bool,
    /// Same value as `yearly_downloads`; kept under both names so dashboard
    /// code that sorts on `popularity` keeps working.
    pub popularity: u64,
    pub yearly_downloads: u64,
    pub popularity_tier: PopularityTier,
}

impl RankedPackage {
    pub fn new(candidate: ScoredCandidate, record: &PackageRecord, popularity: PopularityScore) -> Self {
        Self {
            package: candidate.package,
            title: record.title.clone(),
            description: record.description.clone(),
            author: record.author.clone(),
            maintainer: record.maintainer.clone(),
            score: candidate.score,
            match_reasons: candidate.match_reasons,
            is_exact_match: candidate.is_exact_match,
            popularity: popularity.yearly_downloads,
            yearly_downloads: popularity.yearly_downloads,
            popularity_tier: popularity.tier,
        }
    }
}

/// The single response shape for every paginated search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultPage {
    pub results: Vec<RankedPackage>,
    pub total_results: usize,
    pub has_more: bool,
    pub offset: usize,
    pub limit: usize,
}

impl SearchResultPage {
    /// The response for queries too short to search.
    pub fn empty(limit: usize) -> Self {
        Self {
            results: Vec::new(),
            total_results: 0,
            has_more: false,
            offset: 0,
            limit,
        }
    }

    /// Offset to pass for the next "load more" request.
    pub fn next_offset(&self) -> usize {
        self.offset + self.results.len()
    }
}

/// Which engine produced a result list. Part of every result cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchKind {
    Keyword,
    KeywordWithPartial,
    Author,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Keyword => "keyword",
            SearchKind::KeywordWithPartial => "keyword+partial",
            SearchKind::Author => "author",
        }
    }
}
