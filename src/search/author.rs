// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Author relevance: phrase matching over author and maintainer fields.
//!
//! CRAN metadata writes names both ways round ("Hadley Wickham" in
//! `Authors@R`, "Wickham, Hadley" in older `Author` fields), so the query is
//! expanded into name-order variations before matching. Each field takes the
//! first variation that matches; author and maintainer are scored
//! independently and add up.

use crate::error::Result;
use crate::index::PackageIndex;
use crate::popularity::PopularityOracle;
use crate::scoring::ranking::sort_ranked;
use crate::search::matching::PhraseMatcher;
use crate::types::{MatchReason, PackageRecord, RankedPackage, ScoredCandidate};
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::keyword::MIN_QUERY_CHARS;

/// Name-order variations of a lowercased, trimmed query.
///
/// The query itself always comes first. `"last, first"` adds `"first last"`;
/// a two-word `"first last"` adds `"last, first"`.
pub fn name_variations(query: &str) -> Vec<String> {
    let mut variations = vec![query.to_string()];

    let comma_parts: Vec<&str> = query.split(',').map(str::trim).collect();
    if query.contains(',') {
        if let [last, first] = comma_parts.as_slice() {
            if !last.is_empty() && !first.is_empty() {
                variations.push(format!("{first} {last}"));
            }
        }
    } else {
        let words: Vec<&str> = query.split_whitespace().collect();
        if let [first, last] = words.as_slice() {
            variations.push(format!("{last}, {first}"));
        }
    }

    variations.dedup();
    variations
}

pub struct AuthorEngine {
    index: Arc<PackageIndex>,
    oracle: Arc<PopularityOracle>,
}

struct Scan {
    matchers: Vec<PhraseMatcher>,
    author_weight: f64,
    maintainer_weight: f64,
}

impl Scan {
    fn evaluate(&self, record: &PackageRecord) -> Option<ScoredCandidate> {
        let mut score = 0.0;
        let mut match_reasons = Vec::with_capacity(2);

        if self.matchers.iter().any(|m| m.is_match(&record.author)) {
            score += self.author_weight;
            match_reasons.push(MatchReason::Author);
        }
        if self.matchers.iter().any(|m| m.is_match(&record.maintainer)) {
            score += self.maintainer_weight;
            match_reasons.push(MatchReason::Maintainer);
        }

        (score > 0.0).then(|| ScoredCandidate {
            package: record.name.clone(),
            score,
            match_reasons,
            is_exact_match: true,
        })
    }
}

impl AuthorEngine {
    pub fn new(index: Arc<PackageIndex>, oracle: Arc<PopularityOracle>) -> Self {
        Self { index, oracle }
    }

    /// Packages whose author or maintainer field names `query`, in index
    /// order, carrying their field score.
    pub fn candidates(&self, query: &str) -> Result<Vec<ScoredCandidate>> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let mut matchers = Vec::new();
        for variation in name_variations(&query) {
            if let Some(m) = PhraseMatcher::new(&variation)? {
                matchers.push(m);
            }
        }
        if matchers.is_empty() {
            return Ok(Vec::new());
        }

        let weights = self.oracle.weights();
        let scan = Scan {
            matchers,
            author_weight: weights.author_field,
            maintainer_weight: weights.maintainer_field,
        };
        let records = self.index.as_slice();

        #[cfg(feature = "parallel")]
        let hits = records.par_iter().filter_map(|r| scan.evaluate(r)).collect();

        #[cfg(not(feature = "parallel"))]
        let hits = records.iter().filter_map(|r| scan.evaluate(r)).collect();

        Ok(hits)
    }

    /// The full ranked result list for `query`.
    pub async fn search(&self, query: &str) -> Result<Vec<RankedPackage>> {
        let candidates = self.candidates(query)?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<&str> = candidates.iter().map(|c| c.package.as_str()).collect();
        let popularity = self.oracle.scores_of(&names).await;

        let mut results: Vec<RankedPackage> = candidates
            .into_iter()
            .zip(popularity)
            .filter_map(|(candidate, downloads)| {
                let record = self.index.get(&candidate.package)?;
                let score = self.oracle.describe(&record.name, downloads);
                Some(RankedPackage::new(candidate, record, score))
            })
            .collect();

        sort_ranked(&mut results);
        debug!(query, matches = results.len(), "author search");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{make_author_record, oracle_with};

    #[test]
    fn test_variations_for_first_last() {
        assert_eq!(
            name_variations("hadley wickham"),
            vec!["hadley wickham", "wickham, hadley"]
        );
    }

    #[test]
    fn test_variations_for_last_comma_first() {
        assert_eq!(
            name_variations("wickham, hadley"),
            vec!["wickham, hadley", "hadley wickham"]
        );
    }

    #[test]
    fn test_variations_for_single_or_long_names() {
        assert_eq!(name_variations("wickham"), vec!["wickham"]);
        assert_eq!(name_variations("jan de leeuw"), vec!["jan de leeuw"]);
        assert_eq!(name_variations("a, b, c"), vec!["a, b, c"]);
    }

    fn engine() -> AuthorEngine {
        let index = PackageIndex::from_records(vec![
            make_author_record("ggplot2", "Hadley Wickham [aut, cre]", "Hadley Wickham <hadley@posit.co>"),
            make_author_record("plyr", "Wickham, Hadley", "Someone Else <x@y.z>"),
            make_author_record("other", "Hadley Wickham-Jones", ""),
        ]);
        let oracle = oracle_with(&[("ggplot2", 900_000), ("plyr", 200_000), ("other", 5_000_000)]);
        AuthorEngine::new(Arc::new(index), oracle)
    }

    #[tokio::test]
    async fn test_field_scores_add_up() {
        let results = engine().search("Hadley Wickham").await.unwrap();
        let names: Vec<_> = results.iter().map(|r| r.package.as_str()).collect();
        assert_eq!(names, vec!["ggplot2", "plyr"]);
        assert_eq!(results[0].score, 27.0);
        assert_eq!(
            results[0].match_reasons,
            vec![MatchReason::Author, MatchReason::Maintainer]
        );
        assert_eq!(results[1].score, 15.0);
    }

    #[tokio::test]
    async fn test_short_author_query_is_empty() {
        assert!(engine().search(" h ").await.unwrap().is_empty());
    }

    #[test]
    fn test_reversed_query_finds_same_packages() {
        let e = engine();
        let mut forward: Vec<_> = e.candidates("hadley wickham").unwrap().into_iter().map(|c| c.package).collect();
        let mut reversed: Vec<_> = e.candidates("Wickham, Hadley").unwrap().into_iter().map(|c| c.package).collect();
        forward.sort();
        reversed.sort();
        assert_eq!(forward, reversed);
    }
}
