// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /search/keywords?q&limit&offset&partial` | `SearchResultPage` |
//! | `GET /search/authors?q&limit&offset` | `SearchResultPage` |
//! | `GET /search/names?q&limit` | `[name]` |
//! | `GET /packages/:name` | `{record, popularity}` or 404 |
//! | `GET /ranking/:packages` | `[RankRow]` or 404 |
//! | `GET /categories/:category?limit` | `[CategoryEntry]` |
//! | `GET /research/:area?limit` | `[ResearchEntry]` |
//! | `GET /trending?limit` | `[TrendingEntry]` |
//! | `GET /api/recommend/:keywords` | `SearchResultPage` (legacy) |
//! | `GET /api/author/:name` | `SearchResultPage` (legacy) |
//! | `GET /api/trending-packages?limit` | `[TrendingEntry]` (legacy) |
//! | `GET /healthz` | `{status, packages, fallback, lastUpdated}` |

pub mod error;
pub mod handlers;

use crate::service::SearchService;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
}

impl AppState {
    pub fn new(service: Arc<SearchService>) -> Self {
        Self { service }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/search/keywords", get(handlers::search_keywords))
        .route("/search/authors", get(handlers::search_authors))
        .route("/search/names", get(handlers::search_names))
        .route("/packages/:name", get(handlers::package))
        .route("/ranking/:packages", get(handlers::ranking))
        .route("/categories/:category", get(handlers::category))
        .route("/research/:area", get(handlers::research))
        .route("/trending", get(handlers::trending))
        .route("/api/recommend/:keywords", get(handlers::legacy_recommend))
        .route("/api/author/:name", get(handlers::legacy_author))
        .route("/api/trending-packages", get(handlers::trending))
        .with_state(state)
}

/// Serve until ctrl-c.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    info!(?addr, packages = state.service.index().len(), "listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        // No signal handler: run until the process is killed.
        Err(_) => std::future::pending::<()>().await,
    }
}
