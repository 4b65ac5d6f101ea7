// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text matchers used by the relevance engines.
//!
//! Both matchers escape their input before building a pattern, so a query can
//! never inject regex syntax. Matching is case-insensitive.
//!
//! - `WordMatcher`: every token must appear as a whole word (`\b` on both
//!   sides). Used for titles and descriptions.
//! - `PhraseMatcher`: the words must appear consecutively, separated by any
//!   run of whitespace, and not be glued to a neighbouring name. Used for
//!   author and maintainer fields, where `-` and `_` are part of names.

use crate::error::Result;
use regex::Regex;

/// Split a keyword query into search tokens.
///
/// Lowercases, splits on runs of whitespace and commas, and drops tokens
/// shorter than two characters.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Characters that continue a personal name.
pub fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// All-tokens whole-word matcher.
#[derive(Debug, Clone)]
pub struct WordMatcher {
    patterns: Vec<Regex>,
}

impl WordMatcher {
    pub fn new<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let patterns = tokens
            .iter()
            .map(|t| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(t.as_ref()))))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True when every token occurs in `text` as a whole word.
    ///
    /// A matcher with no tokens matches nothing.
    pub fn matches_all(&self, text: &str) -> bool {
        !self.patterns.is_empty() && self.patterns.iter().all(|p| p.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Whole-phrase matcher with name-aware boundaries.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    regex: Regex,
    bounded_start: bool,
    bounded_end: bool,
}

impl PhraseMatcher {
    /// `None` when the phrase has no words.
    pub fn new(phrase: &str) -> Result<Option<Self>> {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        let (Some(first), Some(last)) = (words.first(), words.last()) else {
            return Ok(None);
        };
        let body = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join(r"\s+");
        let regex = Regex::new(&format!("(?i){body}"))?;

        // Only enforce a boundary on a side that ends in a name character;
        // "wickham," should still match "Wickham, Hadley".
        Ok(Some(Self {
            regex,
            bounded_start: first.chars().next().is_some_and(is_name_char),
            bounded_end: last.chars().next_back().is_some_and(is_name_char),
        }))
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        let mut at = 0;
        while at <= haystack.len() {
            let Some(m) = self.regex.find_at(haystack, at) else {
                return false;
            };
            if self.accepts(haystack, m.start(), m.end()) {
                return true;
            }
            // Retry one character further on; matches may overlap.
            at = m.start()
                + haystack[m.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
        }
        false
    }

    fn accepts(&self, haystack: &str, start: usize, end: usize) -> bool {
        // INVARIANT: PHRASE_BOUNDARY
        // A match glued to a neighbouring name character is not a match.
        let before_ok = !self.bounded_start
            || !haystack[..start].chars().next_back().is_some_and(is_name_char);
        let after_ok =
            !self.bounded_end || !haystack[end..].chars().next().is_some_and(is_name_char);
        before_ok && after_ok
    }
}
