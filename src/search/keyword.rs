// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Keyword relevance: whole-word matching over titles and descriptions.
//!
//! # Algorithm
//!
//! 1. Tokenize the query (see [`tokenize`]). No tokens, no results.
//! 2. A package qualifies when every token is a whole word of its title, or
//!    every token is a whole word of its description.
//! 3. Look up annual downloads for every qualifying package.
//! 4. Score = downloads, plus the capped title bonus on title matches.
//! 5. Sort by downloads, then name.
//!
//! With `include_partial`, packages that fail step 2 but contain every token
//! as a substring of their name, title or description are appended after all
//! whole-word matches, sorted the same way among themselves.

use crate::error::Result;
use crate::index::PackageIndex;
use crate::popularity::PopularityOracle;
use crate::scoring::ranking::sort_ranked;
use crate::search::matching::{tokenize, WordMatcher};
use crate::types::{MatchReason, PackageRecord, RankedPackage, ScoredCandidate};
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Queries shorter than this (after trimming) are not searched.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordOptions {
    /// Append substring matches after whole-word matches.
    pub include_partial: bool,
}

pub struct KeywordEngine {
    index: Arc<PackageIndex>,
    oracle: Arc<PopularityOracle>,
}

/// Query state shared by every record evaluation in one scan.
struct Scan {
    words: WordMatcher,
    tokens: Vec<String>,
    include_partial: bool,
}

impl Scan {
    fn evaluate(&self, record: &PackageRecord) -> Option<ScoredCandidate> {
        let title_match = self.words.matches_all(&record.title);
        let description_match = self.words.matches_all(&record.description);

        if title_match || description_match {
            let mut match_reasons = Vec::with_capacity(2);
            if title_match {
                match_reasons.push(MatchReason::Title);
            }
            if description_match {
                match_reasons.push(MatchReason::Description);
            }
            return Some(ScoredCandidate {
                package: record.name.clone(),
                score: 0.0,
                match_reasons,
                is_exact_match: true,
            });
        }

        if self.include_partial && self.partial_match(record) {
            return Some(ScoredCandidate {
                package: record.name.clone(),
                score: 0.0,
                match_reasons: vec![MatchReason::Partial],
                is_exact_match: false,
            });
        }
        None
    }

    fn partial_match(&self, record: &PackageRecord) -> bool {
        let haystack = format!(
            "{}\n{}\n{}",
            record.name, record.title, record.description
        )
        .to_lowercase();
        self.tokens.iter().all(|t| haystack.contains(t.as_str()))
    }
}

impl KeywordEngine {
    pub fn new(index: Arc<PackageIndex>, oracle: Arc<PopularityOracle>) -> Self {
        Self { index, oracle }
    }

    /// Qualifying packages in index order, unenriched.
    ///
    /// Whole-word matches come first, then partial matches.
    pub fn candidates(&self, query: &str, options: KeywordOptions) -> Result<Vec<ScoredCandidate>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let scan = Scan {
            words: WordMatcher::new(&tokens)?,
            tokens,
            include_partial: options.include_partial,
        };
        let records = self.index.as_slice();

        #[cfg(feature = "parallel")]
        let hits: Vec<ScoredCandidate> = records.par_iter().filter_map(|r| scan.evaluate(r)).collect();

        #[cfg(not(feature = "parallel"))]
        let hits: Vec<ScoredCandidate> = records.iter().filter_map(|r| scan.evaluate(r)).collect();

        let (mut exact, partial): (Vec<_>, Vec<_>) = hits.into_iter().partition(|c| c.is_exact_match);
        exact.extend(partial);
        Ok(exact)
    }

    /// The full ranked result list for `query`.
    pub async fn search(&self, query: &str, options: KeywordOptions) -> Result<Vec<RankedPackage>> {
        let candidates = self.candidates(query, options)?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<&str> = candidates.iter().map(|c| c.package.as_str()).collect();
        let popularity = self.oracle.scores_of(&names).await;
        let weights = *self.oracle.weights();

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for (mut candidate, downloads) in candidates.into_iter().zip(popularity) {
            let Some(record) = self.index.get(&candidate.package) else {
                continue;
            };
            candidate.score = if candidate.is_exact_match {
                weights.keyword_score(downloads, candidate.has_reason(MatchReason::Title))
            } else {
                downloads as f64
            };
            let ranked = RankedPackage::new(
                candidate,
                record,
                self.oracle.describe(&record.name, downloads),
            );
            if ranked.is_exact_match {
                exact.push(ranked);
            } else {
                partial.push(ranked);
            }
        }

        sort_ranked(&mut exact);
        sort_ranked(&mut partial);
        debug!(
            query,
            exact = exact.len(),
            partial = partial.len(),
            "keyword search"
        );
        exact.extend(partial);
        Ok(exact)
    }
}
