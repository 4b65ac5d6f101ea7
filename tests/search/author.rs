//! Author and maintainer matching.

use crate::common::{fixture_service, names};
use cranscope::{MatchReason, SearchResultPage, SearchService};

async fn authors(service: &SearchService, query: &str) -> SearchResultPage {
    service
        .search_authors(query, 0, 100)
        .await
        .expect("author search should succeed")
}

#[tokio::test]
async fn test_hadley_wickham() {
    let service = fixture_service();
    let page = authors(&service, "Hadley Wickham").await;

    assert_eq!(names(&page.results), vec!["dplyr", "ggplot2", "plyr"]);

    let dplyr = &page.results[0];
    assert_eq!(dplyr.score, 27.0);
    assert_eq!(
        dplyr.match_reasons,
        vec![MatchReason::Author, MatchReason::Maintainer]
    );
    let ggplot2 = &page.results[1];
    assert_eq!(ggplot2.score, 15.0);
    assert_eq!(ggplot2.match_reasons, vec![MatchReason::Author]);
}

#[tokio::test]
async fn test_name_order_is_equivalent() {
    let service = fixture_service();
    let forward = authors(&service, "Hadley Wickham").await;
    let reversed = authors(&service, "Wickham, Hadley").await;
    assert_eq!(names(&forward.results), names(&reversed.results));

    let forward = authors(&service, "Jun Chen").await;
    let reversed = authors(&service, "Chen, Jun").await;
    assert_eq!(names(&forward.results), names(&reversed.results));
}

#[tokio::test]
async fn test_jun_chen_excludes_meijun_chen() {
    let service = fixture_service();
    let page = authors(&service, "Jun Chen").await;

    // coauthr writes the name as "Chen, Jun"
    assert_eq!(names(&page.results), vec!["chenlab", "coauthr"]);
    assert!(!names(&page.results).contains(&"scMeta"));
    assert_eq!(page.results[1].match_reasons, vec![MatchReason::Author]);
}

#[tokio::test]
async fn test_longer_name_still_matches_itself() {
    let service = fixture_service();
    let page = authors(&service, "Meijun Chen").await;
    assert_eq!(names(&page.results), vec!["scMeta"]);
}

#[tokio::test]
async fn test_author_only_packages_rank_by_downloads() {
    let service = fixture_service();
    let page = authors(&service, "Rob Hyndman").await;

    assert_eq!(names(&page.results), vec!["forecast", "tsibble", "fable"]);
    assert_eq!(page.results[0].score, 27.0);
    assert_eq!(page.results[1].score, 15.0);
}

#[tokio::test]
async fn test_case_insensitive() {
    let service = fixture_service();
    let lower = authors(&service, "hadley wickham").await;
    let upper = authors(&service, "HADLEY WICKHAM").await;
    assert_eq!(lower.total_results, 3);
    assert_eq!(names(&lower.results), names(&upper.results));
}

#[tokio::test]
async fn test_surname_alone_is_a_phrase() {
    let service = fixture_service();
    let page = authors(&service, "Wickham").await;
    assert_eq!(names(&page.results), vec!["dplyr", "ggplot2", "plyr"]);
}

#[tokio::test]
async fn test_short_and_unknown_names() {
    let service = fixture_service();
    assert_eq!(authors(&service, "J").await, SearchResultPage::empty(100));
    assert_eq!(authors(&service, "Nobody Known").await.total_results, 0);
}
