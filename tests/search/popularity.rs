//! Ranking while the download source is degraded.

use crate::common::{fixture_index, names, DOWNLOADS};
use cranscope::testing::{make_oracle, FixedSource};
use cranscope::{Config, KeywordOptions, SearchService, UnavailableSource};
use std::sync::Arc;

fn source_without(skip: &[&str]) -> FixedSource {
    DOWNLOADS
        .iter()
        .filter(|(name, _)| !skip.contains(name))
        .fold(FixedSource::new(), |s, (name, n)| s.yearly(name, *n))
}

#[tokio::test]
async fn test_recent_window_is_annualised() {
    let source = source_without(&["zoo", "xts"])
        .recent_only("zoo", 100_000)
        .failing("xts");
    let service = SearchService::with_oracle(
        Config::default(),
        fixture_index(),
        make_oracle(Arc::new(source)),
    );

    let page = service
        .search_keywords("time series", 0, 20, KeywordOptions::default())
        .await
        .unwrap();
    assert_eq!(
        names(&page.results),
        vec!["forecast", "zoo", "tseries", "tsibble", "xts", "fable", "aTSA", "tsdecomp", "tsnew"]
    );
    let zoo = &page.results[1];
    assert_eq!(zoo.yearly_downloads, 1_200_000);
    // xts comes from the built-in table
    assert_eq!(page.results[4].yearly_downloads, 300_000);
}

#[tokio::test]
async fn test_search_survives_unavailable_source() {
    let service = SearchService::new(Config::default(), fixture_index(), Arc::new(UnavailableSource));
    let page = service
        .search_keywords("time series", 0, 20, KeywordOptions::default())
        .await
        .unwrap();

    assert_eq!(
        names(&page.results),
        vec!["forecast", "zoo", "xts", "aTSA", "fable", "tsdecomp", "tseries", "tsibble", "tsnew"]
    );
}

#[tokio::test]
async fn test_static_figures_are_not_cached() {
    let source = Arc::new(source_without(&["xts"]).failing("xts"));
    let oracle = make_oracle(source.clone());

    assert_eq!(oracle.score_of("xts").await, 300_000);
    source.recover("xts", 2_200_000);
    assert_eq!(oracle.score_of("xts").await, 2_200_000);

    let calls = source.calls();
    assert_eq!(oracle.score_of("xts").await, 2_200_000);
    assert_eq!(source.calls(), calls);
}
