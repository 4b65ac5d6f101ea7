//! Paging through result lists under both cache policies.

use crate::common::{fixture_service, fixture_service_with, names};
use cranscope::{CachePolicy, Config, KeywordOptions, RankedPackage, SearchService};

async fn walk_pages(service: &SearchService, query: &str, limit: usize) -> Vec<RankedPackage> {
    let mut collected = Vec::new();
    let mut offset = 0;
    loop {
        let page = service
            .search_keywords(query, offset, limit, KeywordOptions::default())
            .await
            .unwrap();
        assert_eq!(page.offset, offset);
        assert_eq!(page.limit, limit);
        assert!(page.results.len() <= limit);
        assert_eq!(page.total_results, 9);
        collected.extend(page.results.iter().cloned());
        if !page.has_more {
            break;
        }
        offset = page.next_offset();
    }
    collected
}

#[tokio::test]
async fn test_pages_concatenate_to_full_list() {
    let service = fixture_service();
    let full = service
        .search_keywords("time series", 0, 100, KeywordOptions::default())
        .await
        .unwrap();

    for limit in [1, 2, 4, 9, 20] {
        let walked = walk_pages(&service, "time series", limit).await;
        assert_eq!(names(&walked), names(&full.results), "limit {limit}");
    }
}

#[tokio::test]
async fn test_has_more_accounting() {
    let service = fixture_service();
    let first = service
        .search_keywords("time series", 0, 4, KeywordOptions::default())
        .await
        .unwrap();
    assert_eq!(first.results.len(), 4);
    assert!(first.has_more);

    let last = service
        .search_keywords("time series", 8, 4, KeywordOptions::default())
        .await
        .unwrap();
    assert_eq!(names(&last.results), vec!["tsnew"]);
    assert!(!last.has_more);
}

#[tokio::test]
async fn test_offset_past_end() {
    let service = fixture_service();
    let page = service
        .search_keywords("time series", 50, 10, KeywordOptions::default())
        .await
        .unwrap();
    assert!(page.results.is_empty());
    assert_eq!(page.total_results, 9);
    assert_eq!(page.offset, 50);
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_per_page_policy_serves_same_pages() {
    let full_list = fixture_service();
    let per_page = fixture_service_with(Config {
        cache_policy: CachePolicy::PerPage,
        ..Config::default()
    });

    for (offset, limit) in [(0, 3), (3, 3), (6, 3), (2, 5)] {
        let a = full_list
            .search_keywords("time series", offset, limit, KeywordOptions::default())
            .await
            .unwrap();
        let b = per_page
            .search_keywords("time series", offset, limit, KeywordOptions::default())
            .await
            .unwrap();
        assert_eq!(a, b, "offset {offset} limit {limit}");
    }
}

#[tokio::test]
async fn test_cached_pages_survive_repeat_and_clear() {
    let service = fixture_service();
    let before = service
        .search_authors("Hadley Wickham", 1, 1)
        .await
        .unwrap();
    let cached = service
        .search_authors("  hadley WICKHAM ", 1, 1)
        .await
        .unwrap();
    assert_eq!(before, cached);

    service.clear_caches();
    let after = service
        .search_authors("Hadley Wickham", 1, 1)
        .await
        .unwrap();
    assert_eq!(before, after);
    assert_eq!(names(&after.results), vec!["ggplot2"]);
}

#[tokio::test]
async fn test_partial_and_exact_lists_are_cached_apart() {
    let service = fixture_service();
    let exact = service
        .search_keywords("forecast", 0, 10, KeywordOptions::default())
        .await
        .unwrap();
    let partial = service
        .search_keywords("forecast", 0, 10, KeywordOptions { include_partial: true })
        .await
        .unwrap();
    assert_eq!(exact.total_results, 1);
    assert_eq!(partial.total_results, 3);
}
