// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use clap::Parser;
use cranscope::server::{self, AppState};
use cranscope::{
    BiocStats, Config, CranlogsSource, DownloadSource, KeywordOptions, PackageIndex,
    SearchResultPage, SearchService, UnavailableSource,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
use cli::display;
use cli::{Cli, Commands, PageArgs, SourceArgs};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = matches!(
        std::env::var("CRANSCOPE_LOG_JSON").as_deref(),
        Ok("1" | "true" | "yes")
    );
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Environment config with command-line overrides applied.
fn load_config(source: &SourceArgs) -> anyhow::Result<Config> {
    let mut config = Config::from_env().context("invalid CRANSCOPE_* configuration")?;
    if source.snapshot.is_some() {
        config.snapshot = source.snapshot.clone();
    }
    if source.bioc_stats.is_some() {
        config.bioc_stats = source.bioc_stats.clone();
    }
    Ok(config)
}

fn load_index(config: &Config) -> Arc<PackageIndex> {
    Arc::new(match &config.snapshot {
        Some(path) => PackageIndex::load_or_fallback(path),
        None => PackageIndex::fallback(),
    })
}

fn download_source(config: &Config, offline: bool) -> Arc<dyn DownloadSource> {
    if offline {
        Arc::new(UnavailableSource)
    } else {
        Arc::new(CranlogsSource::new(config.cranlogs_url.clone()))
    }
}

/// The service over `config`, with Bioconductor statistics when they load.
fn assemble(config: Config, offline: bool) -> SearchService {
    let index = load_index(&config);
    let downloads = download_source(&config, offline);
    let stats = config.bioc_stats.as_ref().and_then(|path| match BiocStats::load(path) {
        Ok(stats) => Some(Arc::new(stats)),
        Err(e) => {
            warn!(error = %e, "Bioconductor statistics unavailable, ranking browse views by cranlogs");
            None
        }
    });
    let service = SearchService::new(config, index, downloads);
    match stats {
        Some(stats) => service.with_bioc_stats(stats),
        None => service,
    }
}

fn build_service(source: &SourceArgs) -> anyhow::Result<SearchService> {
    let config = load_config(source)?;
    Ok(assemble(config, source.offline))
}

fn print_page(heading: &str, page: &SearchResultPage, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
    } else {
        display::print_page(heading, page);
    }
    Ok(())
}

fn page_limit(service: &SearchService, page: &PageArgs) -> usize {
    let config = service.config();
    match page.limit {
        Some(0) | None => config.default_limit,
        Some(n) => n.min(config.max_limit),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { source, bind } => {
            let mut config = load_config(&source)?;
            if let Some(bind) = bind {
                config.bind = bind;
            }
            config.validate()?;
            let listener = TcpListener::bind(&config.bind)
                .await
                .with_context(|| format!("cannot bind {}", config.bind))?;
            let service = Arc::new(assemble(config, source.offline));
            server::serve(listener, AppState::new(service)).await?;
        }

        Commands::Search { query, partial, source, page } => {
            let service = build_service(&source)?;
            let limit = page_limit(&service, &page);
            let result = service
                .search_keywords(&query, page.offset, limit, KeywordOptions { include_partial: partial })
                .await?;
            print_page(&format!("Packages matching \"{query}\""), &result, page.json)?;
        }

        Commands::Authors { name, source, page } => {
            let service = build_service(&source)?;
            let limit = page_limit(&service, &page);
            let result = service.search_authors(&name, page.offset, limit).await?;
            print_page(&format!("Packages by \"{name}\""), &result, page.json)?;
        }

        Commands::Rank { packages, source, json } => {
            let service = build_service(&source)?;
            match service.rank_estimates(&packages).await {
                Ok(rows) if json => println!("{}", serde_json::to_string_pretty(&rows)?),
                Ok(rows) => display::print_ranks(&rows),
                Err(unknown) => anyhow::bail!(
                    "unknown packages: {}",
                    unknown.invalid_packages.join(", ")
                ),
            }
        }

        Commands::Trending { limit, source, json } => {
            let service = build_service(&source)?;
            let limit = limit
                .filter(|&n| n > 0)
                .unwrap_or(cranscope::search::DEFAULT_TRENDING_LIMIT)
                .min(service.config().max_limit);
            let rows = service.trending(limit).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                display::print_trending(&rows);
            }
        }

        Commands::Inspect { source, json } => {
            let config = load_config(&source)?;
            let index = load_index(&config);
            inspect(&index, json)?;
        }
    }

    Ok(())
}

fn inspect(index: &PackageIndex, json: bool) -> anyhow::Result<()> {
    let mut tags: BTreeMap<&str, usize> = BTreeMap::new();
    for record in index.all() {
        for tag in &record.category_tags {
            *tags.entry(tag.as_str()).or_default() += 1;
        }
    }
    let with_author = index.all().filter(|r| !r.author.is_empty()).count();

    if json {
        let summary = serde_json::json!({
            "packages": index.len(),
            "fallback": index.is_fallback(),
            "lastUpdated": index.last_updated(),
            "withAuthor": with_author,
            "tags": tags,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    use display::{row, section_bot, section_top, themed, CYAN, GRAY, GREEN};
    section_top("Snapshot");
    row(&format!(" packages      {}", themed(GREEN, &[], &index.len().to_string())));
    row(&format!(" with author   {}", with_author));
    row(&format!(" updated       {}", index.last_updated().unwrap_or("unknown")));
    if index.is_fallback() {
        row(&themed(GRAY, &[], " built-in fallback list (no snapshot loaded)"));
    }
    section_bot();

    if !tags.is_empty() {
        let mut by_count: Vec<(&str, usize)> = tags.into_iter().collect();
        by_count.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        section_top("Top category tags");
        for (tag, count) in by_count.into_iter().take(15) {
            row(&format!(" {} {}", display::pad_right(&themed(CYAN, &[], tag), 40), count));
        }
        section_bot();
    }
    Ok(())
}
