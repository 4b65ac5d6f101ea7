//! Keyword relevance and popularity ordering.

use crate::common::{fixture_service, make_record, names, oracle_with};
use cranscope::{Config, KeywordOptions, MatchReason, PackageIndex, SearchResultPage, SearchService};
use std::sync::Arc;

const WHOLE_WORDS: KeywordOptions = KeywordOptions {
    include_partial: false,
};
const WITH_PARTIAL: KeywordOptions = KeywordOptions {
    include_partial: true,
};

async fn all_results(service: &SearchService, query: &str, options: KeywordOptions) -> SearchResultPage {
    service
        .search_keywords(query, 0, 100, options)
        .await
        .expect("search should succeed")
}

#[tokio::test]
async fn test_time_series_ranked_by_downloads() {
    let service = fixture_service();
    let page = all_results(&service, "time series", WHOLE_WORDS).await;

    assert_eq!(
        names(&page.results),
        vec!["zoo", "xts", "forecast", "tseries", "tsibble", "fable", "aTSA", "tsdecomp", "tsnew"]
    );
    assert_eq!(page.total_results, 9);
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_match_reasons_name_the_fields() {
    let service = fixture_service();
    let page = all_results(&service, "time series", WHOLE_WORDS).await;

    let forecast = page.results.iter().find(|r| r.package == "forecast").unwrap();
    assert_eq!(
        forecast.match_reasons,
        vec![MatchReason::Title, MatchReason::Description]
    );
    let tsibble = page.results.iter().find(|r| r.package == "tsibble").unwrap();
    assert_eq!(tsibble.match_reasons, vec![MatchReason::Description]);
    assert!(page.results.iter().all(|r| r.is_exact_match));
}

#[tokio::test]
async fn test_scores_carry_capped_title_bonus() {
    let service = fixture_service();
    let page = all_results(&service, "time series", WHOLE_WORDS).await;
    let score_of = |name: &str| page.results.iter().find(|r| r.package == name).unwrap().score;

    // 1.9M + min(10%, 50k)
    assert_eq!(score_of("forecast"), 1_950_000.0);
    // description only: plain downloads
    assert_eq!(score_of("tsibble"), 400_000.0);
    // title match with no download data
    assert_eq!(score_of("tsnew"), 1_000.0);
}

#[tokio::test]
async fn test_title_bonus_never_reorders() {
    let index = Arc::new(PackageIndex::from_records(vec![
        make_record("descpkg", "Unrelated Title", "Tools for survival analysis"),
        make_record("titlepkg", "Survival Analysis", "Something else"),
    ]));
    let oracle = oracle_with(&[("descpkg", 100_000), ("titlepkg", 99_000)]);
    let service = SearchService::with_oracle(Config::default(), index, oracle);

    let page = all_results(&service, "survival analysis", WHOLE_WORDS).await;
    assert_eq!(names(&page.results), vec!["descpkg", "titlepkg"]);
    assert!(page.results[1].score > page.results[0].score);
}

#[tokio::test]
async fn test_equal_downloads_tie_break_on_name() {
    let service = fixture_service();
    let page = all_results(&service, "time series", WHOLE_WORDS).await;
    let pos = |name: &str| page.results.iter().position(|r| r.package == name).unwrap();

    assert_eq!(page.results[pos("aTSA")].popularity, page.results[pos("tsdecomp")].popularity);
    assert!(pos("aTSA") < pos("tsdecomp"));
}

#[tokio::test]
async fn test_tie_break_ignores_case() {
    let index = Arc::new(PackageIndex::from_records(vec![
        make_record("edgeR", "Time Series of Counts", ""),
        make_record("DESeq2", "Time Series Designs", ""),
        make_record("aTSA", "Alternative Time Series Analysis", ""),
    ]));
    let oracle = oracle_with(&[("edgeR", 100), ("DESeq2", 100), ("aTSA", 100)]);
    let service = SearchService::with_oracle(Config::default(), index, oracle);

    let page = all_results(&service, "time series", WHOLE_WORDS).await;
    assert_eq!(names(&page.results), vec!["aTSA", "DESeq2", "edgeR"]);
}

#[tokio::test]
async fn test_every_token_required() {
    let service = fixture_service();

    let page = all_results(&service, "gene expression", WHOLE_WORDS).await;
    assert_eq!(names(&page.results), vec!["DESeq2", "edgeR"]);

    let page = all_results(&service, "gene microarray", WHOLE_WORDS).await;
    assert_eq!(page.total_results, 0);
}

#[tokio::test]
async fn test_commas_and_case_are_ignored() {
    let service = fixture_service();
    let plain = all_results(&service, "gene expression", WHOLE_WORDS).await;
    let noisy = all_results(&service, "  Gene,EXPRESSION ", WHOLE_WORDS).await;
    assert_eq!(names(&plain.results), names(&noisy.results));
}

#[tokio::test]
async fn test_whole_words_only_by_default() {
    let service = fixture_service();
    // "forecasting" and the package name do not count as the word "forecast"
    let page = all_results(&service, "forecast", WHOLE_WORDS).await;
    assert_eq!(names(&page.results), vec!["fable"]);
}

#[tokio::test]
async fn test_partial_matches_follow_exact_matches() {
    let service = fixture_service();
    let page = all_results(&service, "forecast", WITH_PARTIAL).await;

    assert_eq!(names(&page.results), vec!["fable", "forecast", "aTSA"]);
    assert!(page.results[0].is_exact_match);
    assert!(!page.results[1].is_exact_match);
    assert_eq!(page.results[1].match_reasons, vec![MatchReason::Partial]);
    // partial tier is less popular-first only within itself
    assert!(page.results[1].popularity > page.results[0].popularity);
}

#[tokio::test]
async fn test_single_character_query_is_empty() {
    let service = fixture_service();
    for query in ["", "R", " x ", "é"] {
        let page = service.search_keywords(query, 40, 20, WHOLE_WORDS).await.unwrap();
        assert_eq!(page, SearchResultPage::empty(20), "query {query:?}");
    }
}

#[tokio::test]
async fn test_two_character_query_is_searched() {
    let service = fixture_service();
    let page = service.search_keywords("ts", 5, 10, WHOLE_WORDS).await.unwrap();
    assert_eq!(page.total_results, 0);
    assert_eq!(page.offset, 5);
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_regex_metacharacters_are_literal() {
    let service = fixture_service();
    for query in ["c++ (beta)", "a.b*", "[ts]", "\\d+"] {
        let page = service.search_keywords(query, 0, 20, WHOLE_WORDS).await;
        assert!(page.is_ok(), "query {query:?} failed");
    }
}

#[tokio::test]
async fn test_search_is_deterministic() {
    let first = all_results(&fixture_service(), "time series", WITH_PARTIAL).await;
    for _ in 0..5 {
        let again = all_results(&fixture_service(), "time series", WITH_PARTIAL).await;
        assert_eq!(first, again);
    }
}
