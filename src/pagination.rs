// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Offset/limit windows over ranked result lists, with result caching.
//!
//! # Invariants
//!
//! - `total_results` is the length of the full list, whatever the window.
//! - `has_more == offset + results.len() < total_results`.
//! - The requested `offset` is echoed unchanged, even past the end of the
//!   list. Such a page is empty with `has_more == false`, so a client paging
//!   by `next_offset` stops there.
//! - Under `CachePolicy::FullList`, every page for a query within the TTL is
//!   cut from the same list, so consecutive pages neither overlap nor skip.

use crate::cache::TtlCache;
use crate::config::CachePolicy;
use crate::error::Result;
use crate::types::{RankedPackage, SearchKind, SearchResultPage};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Parse a raw `limit` parameter.
///
/// Missing, unparsable or zero means `default`; anything above `max` is
/// clamped.
pub fn resolve_limit(raw: Option<&str>, default: usize, max: usize) -> usize {
    match raw.and_then(|v| v.trim().parse::<usize>().ok()) {
        Some(0) | None => default.min(max),
        Some(n) => n.min(max),
    }
}

/// Parse a raw `offset` parameter. Missing or unparsable means 0.
pub fn resolve_offset(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0)
}

/// Cut one page out of a full, sorted result list.
///
/// An `offset` beyond the list yields an empty page that still reports the
/// requested offset rather than a clamped one.
pub fn paginate(list: &[RankedPackage], offset: usize, limit: usize) -> SearchResultPage {
    let total_results = list.len();
    let start = offset.min(total_results);
    let end = start.saturating_add(limit).min(total_results);
    let results = list[start..end].to_vec();

    // INVARIANT: PAGE_ACCOUNTING
    let has_more = offset.saturating_add(results.len()) < total_results;
    SearchResultPage {
        results,
        total_results,
        has_more,
        offset,
        limit,
    }
}

/// Cache key text for a query: trimmed and lowercased.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

type ListKey = (SearchKind, String);
type PageKey = (SearchKind, String, usize, usize);

/// Serves pages of search results, running the engine only on cache misses.
pub struct ResultCursor {
    policy: CachePolicy,
    lists: TtlCache<ListKey, Arc<Vec<RankedPackage>>>,
    pages: TtlCache<PageKey, SearchResultPage>,
}

impl ResultCursor {
    pub fn new(policy: CachePolicy, ttl: Duration) -> Self {
        Self {
            policy,
            lists: TtlCache::new(ttl),
            pages: TtlCache::new(ttl),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// The page at `offset`/`limit` for `query`.
    ///
    /// `produce` runs the engine and returns the full sorted list. It is only
    /// called when nothing usable is cached.
    pub async fn page<F, Fut>(
        &self,
        kind: SearchKind,
        query: &str,
        offset: usize,
        limit: usize,
        produce: F,
    ) -> Result<SearchResultPage>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<RankedPackage>>>,
    {
        let query = normalize_query(query);
        match self.policy {
            CachePolicy::FullList => {
                let key = (kind, query);
                if let Some(list) = self.lists.get(&key) {
                    debug!(kind = kind.as_str(), query = %key.1, offset, limit, "result list cache hit");
                    return Ok(paginate(&list, offset, limit));
                }
                let list = Arc::new(produce().await?);
                let page = paginate(&list, offset, limit);
                self.lists.insert(key, list);
                Ok(page)
            }
            CachePolicy::PerPage => {
                let key = (kind, query, offset, limit);
                if let Some(page) = self.pages.get(&key) {
                    debug!(kind = kind.as_str(), query = %key.1, offset, limit, "result page cache hit");
                    return Ok(page);
                }
                let list = produce().await?;
                let page = paginate(&list, offset, limit);
                self.pages.insert(key, page.clone());
                Ok(page)
            }
        }
    }

    pub fn clear(&self) {
        self.lists.clear();
        self.pages.clear();
    }
}
