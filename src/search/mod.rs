// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search engines: where queries turn into ranked package lists.
//!
//! Every engine follows the same shape. A synchronous scan over the index
//! decides which packages qualify; an async enrichment step looks up their
//! downloads; a final sort puts the most downloaded first. Keyword and author
//! search return full lists for the cursor to paginate. The browse helpers
//! (names, categories, research areas, trending packages) return short ranked
//! lists directly.

pub mod author;
pub mod category;
pub mod keyword;
pub mod matching;
pub mod names;
pub mod research;
pub mod trending;

pub use author::{name_variations, AuthorEngine};
pub use category::{rank_category, CategoryEntry};
pub use keyword::{KeywordEngine, KeywordOptions, MIN_QUERY_CHARS};
pub use matching::{tokenize, PhraseMatcher, WordMatcher};
pub use names::suggest_names;
pub use research::{area_keywords, search_research_area, ResearchEntry};
pub use trending::{trending_packages, TrendingEntry, DEFAULT_TRENDING_LIMIT, TRENDING_CANDIDATES};
