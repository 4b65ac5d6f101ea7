// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The assembled search service.
//!
//! `SearchService` owns one of everything (index, oracle, engines, cursor and
//! the browse caches) and is what the HTTP router and the CLI both talk to.
//! It is `Send + Sync` and meant to live in an `Arc` for the process lifetime.
//!
//! Category and research views rank through a separate popularity lookup.
//! It is the oracle by default; `with_bioc_stats` layers Bioconductor
//! download statistics over it.

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::Result;
use crate::index::PackageIndex;
use crate::pagination::{normalize_query, ResultCursor};
use crate::popularity::{
    BiocPopularity, BiocStats, DownloadSource, OracleSettings, PopularityLookup, PopularityOracle,
};
use crate::scoring::{estimate_rank, RankEstimate};
use crate::search::category::{rank_category, CategoryEntry};
use crate::search::names::suggest_names;
use crate::search::research::{search_research_area, ResearchEntry};
use crate::search::trending::{trending_packages, TrendingEntry, TRENDING_CANDIDATES};
use crate::search::{AuthorEngine, KeywordEngine, KeywordOptions, MIN_QUERY_CHARS};
use crate::types::{PackageRecord, PopularityScore, SearchKind, SearchResultPage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A package with its current popularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDetails {
    pub record: PackageRecord,
    pub popularity: PopularityScore,
}

/// One row of a rank-estimate response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRow {
    pub package: String,
    #[serde(flatten)]
    pub estimate: RankEstimate,
    pub source: String,
}

/// Rank lookup named packages the index does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownPackages {
    pub invalid_packages: Vec<String>,
    pub valid_packages: Vec<String>,
}

pub struct SearchService {
    config: Config,
    index: Arc<PackageIndex>,
    oracle: Arc<PopularityOracle>,
    browse: Arc<dyn PopularityLookup>,
    keyword: KeywordEngine,
    author: AuthorEngine,
    cursor: ResultCursor,
    names: TtlCache<(String, usize), Vec<String>>,
    research: TtlCache<(String, usize), Vec<ResearchEntry>>,
    trending: TtlCache<usize, Vec<TrendingEntry>>,
}

impl SearchService {
    /// Build the service over `source` with a fresh popularity cache.
    pub fn new(config: Config, index: Arc<PackageIndex>, source: Arc<dyn DownloadSource>) -> Self {
        let cache = Arc::new(TtlCache::new(config.popularity_ttl()));
        let oracle = Arc::new(PopularityOracle::new(
            source,
            cache,
            OracleSettings::from(&config),
        ));
        Self::with_oracle(config, index, oracle)
    }

    pub fn with_oracle(config: Config, index: Arc<PackageIndex>, oracle: Arc<PopularityOracle>) -> Self {
        Self {
            keyword: KeywordEngine::new(index.clone(), oracle.clone()),
            author: AuthorEngine::new(index.clone(), oracle.clone()),
            cursor: ResultCursor::new(config.cache_policy, config.result_ttl()),
            names: TtlCache::new(config.names_ttl()),
            research: TtlCache::new(config.research_ttl()),
            trending: TtlCache::new(config.trending_ttl()),
            browse: oracle.clone(),
            config,
            index,
            oracle,
        }
    }

    /// Rank category and research views by Bioconductor statistics where
    /// `stats` covers a package.
    pub fn with_bioc_stats(mut self, stats: Arc<BiocStats>) -> Self {
        self.browse = Arc::new(BiocPopularity::new(stats, self.oracle.clone()));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &Arc<PackageIndex> {
        &self.index
    }

    pub fn oracle(&self) -> &Arc<PopularityOracle> {
        &self.oracle
    }

    fn too_short(query: &str) -> bool {
        query.trim().chars().count() < MIN_QUERY_CHARS
    }

    /// One page of keyword results.
    pub async fn search_keywords(
        &self,
        query: &str,
        offset: usize,
        limit: usize,
        options: KeywordOptions,
    ) -> Result<SearchResultPage> {
        if Self::too_short(query) {
            return Ok(SearchResultPage::empty(limit));
        }
        let kind = if options.include_partial {
            SearchKind::KeywordWithPartial
        } else {
            SearchKind::Keyword
        };
        self.cursor
            .page(kind, query, offset, limit, || self.keyword.search(query, options))
            .await
    }

    /// One page of author results.
    pub async fn search_authors(&self, query: &str, offset: usize, limit: usize) -> Result<SearchResultPage> {
        if Self::too_short(query) {
            return Ok(SearchResultPage::empty(limit));
        }
        self.cursor
            .page(SearchKind::Author, query, offset, limit, || self.author.search(query))
            .await
    }

    /// Autocomplete for package names.
    pub fn search_names(&self, query: &str, limit: usize) -> Vec<String> {
        if Self::too_short(query) {
            return Vec::new();
        }
        let key = (normalize_query(query), limit);
        if let Some(hit) = self.names.get(&key) {
            return hit;
        }
        let names = suggest_names(&self.index, query, limit);
        self.names.insert(key, names.clone());
        names
    }

    pub async fn package(&self, name: &str) -> Option<PackageDetails> {
        let record = self.index.get(name)?.clone();
        let popularity = self.oracle.popularity_of(name).await;
        Some(PackageDetails { record, popularity })
    }

    /// Rank estimates for every name, or the split of known and unknown
    /// names if any is missing from the index.
    pub async fn rank_estimates(
        &self,
        names: &[String],
    ) -> std::result::Result<Vec<RankRow>, UnknownPackages> {
        let (valid, invalid): (Vec<String>, Vec<String>) =
            names.iter().cloned().partition(|n| self.index.contains(n));
        if !invalid.is_empty() || valid.is_empty() {
            return Err(UnknownPackages {
                invalid_packages: invalid,
                valid_packages: valid,
            });
        }

        let downloads = self.oracle.scores_of(&valid).await;
        Ok(valid
            .into_iter()
            .zip(downloads)
            .map(|(package, d)| RankRow {
                package,
                estimate: estimate_rank(d),
                source: "estimated".to_string(),
            })
            .collect())
    }

    pub async fn category(&self, category: &str, limit: usize) -> Vec<CategoryEntry> {
        rank_category(&self.index, self.browse.as_ref(), category, limit).await
    }

    pub async fn research(&self, area: &str, limit: usize) -> Vec<ResearchEntry> {
        let key = (normalize_query(area), limit);
        if let Some(hit) = self.research.get(&key) {
            return hit;
        }
        let rows = search_research_area(&self.index, self.browse.as_ref(), area, limit).await;
        self.research.insert(key, rows.clone());
        rows
    }

    /// Fastest-growing packages among the tracked candidates.
    pub async fn trending(&self, limit: usize) -> Vec<TrendingEntry> {
        if let Some(hit) = self.trending.get(&limit) {
            return hit;
        }
        let candidates: Vec<String> = TRENDING_CANDIDATES.iter().map(|c| c.to_string()).collect();
        let settings = self.oracle.settings();
        let rows = trending_packages(
            self.oracle.source().as_ref(),
            &candidates,
            self.oracle.today(),
            settings.primary_timeout,
            settings.concurrency,
            limit,
        )
        .await;
        self.trending.insert(limit, rows.clone());
        rows
    }

    /// Drop cached results and popularity.
    pub fn clear_caches(&self) {
        self.cursor.clear();
        self.names.clear();
        self.research.clear();
        self.trending.clear();
        self.oracle.cache().clear();
    }
}
