// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Route handlers.
//!
//! Query parameters arrive as raw strings so a malformed `limit` or `offset`
//! falls back to its default instead of failing the request.

use super::error::ApiError;
use super::AppState;
use crate::pagination::{resolve_limit, resolve_offset};
use crate::search::category::DEFAULT_CATEGORY_LIMIT;
use crate::search::names::DEFAULT_NAME_LIMIT;
use crate::search::research::DEFAULT_RESEARCH_LIMIT;
use crate::search::trending::DEFAULT_TRENDING_LIMIT;
use crate::search::KeywordOptions;
use crate::types::SearchResultPage;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub partial: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

fn truthy(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes")
    )
}

impl AppState {
    fn page_bounds(&self, limit: Option<&str>, offset: Option<&str>) -> (usize, usize) {
        let config = self.service.config();
        (
            resolve_offset(offset),
            resolve_limit(limit, config.default_limit, config.max_limit),
        )
    }

    async fn keyword_page(
        &self,
        query: &str,
        limit: Option<&str>,
        offset: Option<&str>,
        options: KeywordOptions,
    ) -> Result<SearchResultPage, ApiError> {
        let (offset, limit) = self.page_bounds(limit, offset);
        let page = self
            .service
            .search_keywords(query, offset, limit, options)
            .await
            .map_err(|e| ApiError::internal("Failed to get recommendations", &e))?;
        info!(query, offset, limit, total = page.total_results, "keyword search");
        Ok(page)
    }

    async fn author_page(
        &self,
        query: &str,
        limit: Option<&str>,
        offset: Option<&str>,
    ) -> Result<SearchResultPage, ApiError> {
        let (offset, limit) = self.page_bounds(limit, offset);
        let page = self
            .service
            .search_authors(query, offset, limit)
            .await
            .map_err(|e| ApiError::internal("Failed to search by author", &e))?;
        info!(query, offset, limit, total = page.total_results, "author search");
        Ok(page)
    }
}

pub async fn search_keywords(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResultPage>, ApiError> {
    let options = KeywordOptions {
        include_partial: truthy(params.partial.as_deref()),
    };
    state
        .keyword_page(
            params.q.as_deref().unwrap_or_default(),
            params.limit.as_deref(),
            params.offset.as_deref(),
            options,
        )
        .await
        .map(Json)
}

pub async fn search_authors(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResultPage>, ApiError> {
    state
        .author_page(
            params.q.as_deref().unwrap_or_default(),
            params.limit.as_deref(),
            params.offset.as_deref(),
        )
        .await
        .map(Json)
}

pub async fn legacy_recommend(
    State(state): State<AppState>,
    Path(keywords): Path<String>,
    Query(params): Query<LimitParams>,
) -> Result<Json<SearchResultPage>, ApiError> {
    state
        .keyword_page(
            &keywords,
            params.limit.as_deref(),
            params.offset.as_deref(),
            KeywordOptions::default(),
        )
        .await
        .map(Json)
}

pub async fn legacy_author(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<LimitParams>,
) -> Result<Json<SearchResultPage>, ApiError> {
    state
        .author_page(&name, params.limit.as_deref(), params.offset.as_deref())
        .await
        .map(Json)
}

pub async fn search_names(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<String>> {
    let limit = resolve_limit(
        params.limit.as_deref(),
        DEFAULT_NAME_LIMIT,
        state.service.config().max_limit,
    );
    Json(
        state
            .service
            .search_names(params.q.as_deref().unwrap_or_default(), limit),
    )
}

pub async fn package(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .service
        .package(&name)
        .await
        .map(Json)
        .ok_or_else(|| {
            ApiError::not_found("Package not found", format!("No package named '{name}'"))
        })
}

pub async fn ranking(
    State(state): State<AppState>,
    Path(packages): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let names: Vec<String> = packages
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();

    match state.service.rank_estimates(&names).await {
        Ok(rows) => Ok(Json(rows)),
        Err(unknown) => Err(ApiError::not_found(
            "Invalid package names",
            format!("Unknown packages: {}", unknown.invalid_packages.join(", ")),
        )
        .with_field("invalidPackages", json!(unknown.invalid_packages))
        .with_field("validPackages", json!(unknown.valid_packages))),
    }
}

pub async fn category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    let limit = resolve_limit(params.limit.as_deref(), DEFAULT_CATEGORY_LIMIT, usize::MAX);
    Json(state.service.category(&category, limit).await)
}

pub async fn research(
    State(state): State<AppState>,
    Path(area): Path<String>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    let limit = resolve_limit(
        params.limit.as_deref(),
        DEFAULT_RESEARCH_LIMIT,
        state.service.config().max_limit,
    );
    Json(state.service.research(&area, limit).await)
}

pub async fn trending(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> impl IntoResponse {
    let limit = resolve_limit(
        params.limit.as_deref(),
        DEFAULT_TRENDING_LIMIT,
        state.service.config().max_limit,
    );
    Json(state.service.trending(limit).await)
}

pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    let index = state.service.index();
    Json(json!({
        "status": "ok",
        "packages": index.len(),
        "fallback": index.is_fallback(),
        "lastUpdated": index.last_updated(),
    }))
}
