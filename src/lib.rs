// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Keyword and author search over R package metadata, ranked by downloads.
//!
//! This crate backs a CRAN/Bioconductor statistics dashboard. It keeps every
//! package's metadata in memory, matches queries against titles,
//! descriptions and author fields, ranks matches by annual downloads, and
//! serves stable offset/limit pages of the result.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │   index/     │────▶│   search/     │────▶│ pagination   │
//! │ (snapshot,   │     │ (keyword,     │     │ (paginate,   │
//! │ PackageIndex)│     │  author, ...) │     │ ResultCursor)│
//! └──────────────┘     └───────────────┘     └──────────────┘
//!                              │                    │
//!                              ▼                    ▼
//!                      ┌───────────────┐     ┌──────────────┐
//!                      │ popularity/   │     │   service    │──▶ server/, cli/
//!                      │ (oracle,      │     │ (SearchService)
//!                      │ DownloadSource)     └──────────────┘
//!                      └───────────────┘
//! ```
//!
//! # Ranking rule
//!
//! Results are ordered by annual downloads, then by package name. Relevance
//! scores are reported but never reorder results.
//!
//! # Usage
//!
//! ```ignore
//! use cranscope::{Config, PackageIndex, SearchService, CranlogsSource, KeywordOptions};
//!
//! let config = Config::from_env()?;
//! let index = Arc::new(PackageIndex::load_or_fallback("data/cran.json"));
//! let source = Arc::new(CranlogsSource::new(&config.cranlogs_url));
//! let service = SearchService::new(config, index, source);
//!
//! let page = service.search_keywords("time series", 0, 20, KeywordOptions::default()).await?;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod pagination;
pub mod popularity;
pub mod scoring;
pub mod search;
pub mod server;
pub mod service;
pub mod testing;
mod types;

pub use cache::TtlCache;
pub use config::{CachePolicy, Config};
pub use error::{Error, Result, SourceError};
pub use index::PackageIndex;
pub use pagination::{paginate, resolve_limit, resolve_offset, ResultCursor};
pub use popularity::{
    BiocPopularity, BiocStats, CranlogsSource, DailyDownloads, DateWindow, DownloadSource,
    MonthlyDownloads, OracleSettings, PopularityLookup, PopularityOracle, UnavailableSource,
};
pub use scoring::ranking::{compare_names, compare_ranked, sort_ranked};
pub use scoring::{estimate_rank, popularity_tier, RankEstimate, ScoringWeights};
pub use search::{AuthorEngine, KeywordEngine, KeywordOptions, TrendingEntry};
pub use server::{build_router, AppState};
pub use service::{PackageDetails, RankRow, SearchService, UnknownPackages};
pub use types::{
    MatchReason, PackageRecord, PopularityScore, PopularityTier, RankedPackage, ScoredCandidate,
    SearchKind, SearchResultPage,
};

#[cfg(test)]
mod tests {
    //! Property tests for the text-matching primitives.

    use crate::search::matching::{tokenize, PhraseMatcher, WordMatcher};
    use proptest::prelude::*;

    proptest! {
        /// Tokens are lowercase, at least two characters, and free of
        /// separators.
        #[test]
        fn prop_tokens_are_clean(query in "[A-Za-z ,]{0,40}") {
            for token in tokenize(&query) {
                prop_assert!(token.chars().count() >= 2);
                prop_assert!(!token.contains(' '));
                prop_assert!(!token.contains(','));
                prop_assert_eq!(token.clone(), token.to_lowercase());
            }
        }

        /// Regex metacharacters in a query never break pattern construction.
        #[test]
        fn prop_matchers_accept_any_query(query in ".{0,30}") {
            let tokens = tokenize(&query);
            prop_assert!(WordMatcher::new(&tokens).is_ok());
            prop_assert!(PhraseMatcher::new(&query.to_lowercase()).is_ok());
        }

        /// A standalone name always matches itself.
        #[test]
        fn prop_phrase_matches_itself(first in "[a-z]{2,8}", last in "[a-z]{2,8}") {
            let phrase = format!("{first} {last}");
            let m = PhraseMatcher::new(&phrase).unwrap().unwrap();
            let haystack = format!("{first} {last} <{first}@example.org>");
            prop_assert!(m.is_match(&haystack));
        }

        /// A name glued to a longer name never matches.
        #[test]
        fn prop_phrase_rejects_prefixed_names(prefix in "[a-z]{1,4}", first in "[a-z]{2,8}", last in "[a-z]{2,8}") {
            let m = PhraseMatcher::new(&format!("{first} {last}")).unwrap().unwrap();
            let haystack = format!("{prefix}{first} {last}");
            prop_assert!(!m.is_match(&haystack));
        }
    }
}
