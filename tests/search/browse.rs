//! Name autocomplete, category and research-area listings, rank estimates.

use crate::common::fixture_service;

#[test]
fn test_name_suggestions_prefix_first() {
    let service = fixture_service();
    assert_eq!(
        service.search_names("ts", 10),
        vec!["tsdecomp", "tseries", "tsibble", "tsnew", "aTSA", "xts"]
    );
    assert_eq!(service.search_names("TS", 3), vec!["tsdecomp", "tseries", "tsibble"]);
    assert!(service.search_names("t", 10).is_empty());
}

#[tokio::test]
async fn test_category_ranked_by_downloads() {
    let service = fixture_service();
    let entries = service.category("Software", 50).await;
    let names: Vec<_> = entries.iter().map(|e| e.package.as_str()).collect();
    assert_eq!(names, vec!["limma", "DESeq2", "edgeR", "scMeta"]);
    assert_eq!(entries[0].total_downloads, 120_000);
    assert_eq!(entries[3].download_rank, 4);
}

#[tokio::test]
async fn test_category_tag_case_and_limit() {
    let service = fixture_service();
    let rnaseq = service.category("rnaseq", 50).await;
    let names: Vec<_> = rnaseq.iter().map(|e| e.package.as_str()).collect();
    assert_eq!(names, vec!["DESeq2", "edgeR"]);

    assert_eq!(service.category("Software", 1).await.len(), 1);
    assert!(service.category("Proteomics", 50).await.is_empty());
}

#[tokio::test]
async fn test_research_area_downloads_before_relevance() {
    let service = fixture_service();
    let rows = service.research("rnaseq", 20).await;
    let names: Vec<_> = rows.iter().map(|r| r.package.as_str()).collect();

    assert_eq!(names, vec!["limma", "DESeq2", "edgeR", "aTSA", "scMeta"]);
    // DESeq2 is more relevant but less downloaded
    assert!(rows[1].relevance_score > rows[0].relevance_score);
    assert!(rows.iter().all(|r| r.ranking_basis == "Downloads + Relevance"));
}

#[tokio::test]
async fn test_unknown_area_searches_for_itself() {
    let service = fixture_service();
    let rows = service.research("experimental", 20).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].package, "tsnew");
    assert_eq!(rows[0].total_downloads, 0);
    assert_eq!(rows[0].ranking_basis, "Relevance Only");

    assert!(service.research("cancer", 20).await.is_empty());
    assert!(service.research("  ", 20).await.is_empty());
}

#[tokio::test]
async fn test_rank_estimates() {
    let service = fixture_service();
    let rows = service
        .rank_estimates(&["dplyr".to_string(), "tsnew".to_string()])
        .await
        .unwrap();

    assert_eq!(rows[0].package, "dplyr");
    assert_eq!(rows[0].estimate.rank, Some(100));
    assert_eq!(rows[0].estimate.percentile, Some(99.5));
    assert_eq!(rows[1].estimate.rank, None);
    assert_eq!(rows[1].estimate.downloads, 0);
}

#[tokio::test]
async fn test_rank_estimates_report_unknown_names() {
    let service = fixture_service();
    let err = service
        .rank_estimates(&["zoo".to_string(), "notapkg".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.invalid_packages, vec!["notapkg"]);
    assert_eq!(err.valid_packages, vec!["zoo"]);

    assert!(service.rank_estimates(&[]).await.is_err());
}

#[tokio::test]
async fn test_package_details() {
    let service = fixture_service();
    let details = service.package("DESeq2").await.unwrap();
    assert_eq!(details.record.category_tags.len(), 4);
    assert_eq!(details.popularity.yearly_downloads, 90_000);
    // lookups are exact-case
    assert!(service.package("deseq2").await.is_none());
}
