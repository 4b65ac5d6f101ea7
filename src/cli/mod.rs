// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the cranscope command-line interface.
//!
//! `serve` starts the HTTP API. `search`, `authors`, `rank` and `trending` run the same
//! engines once and print the result, which is handy for checking ranking
//! changes against a snapshot. `inspect` summarises a snapshot file.

pub mod display;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cranscope",
    about = "Keyword and author search over CRAN and Bioconductor packages",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where package metadata and download counts come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Package snapshot (JSON). Falls back to a built-in list when missing.
    #[arg(short, long, env = "CRANSCOPE_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Bioconductor download statistics (JSON) for category and research views
    #[arg(long, env = "CRANSCOPE_BIOC_STATS")]
    pub bioc_stats: Option<PathBuf>,

    /// Never contact cranlogs; use built-in popularity figures only
    #[arg(long)]
    pub offline: bool,
}

/// Result window for one-shot searches.
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Maximum number of results to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Number of results to skip
    #[arg(short, long, default_value = "0")]
    pub offset: usize,

    /// Print the raw JSON page instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Address to listen on (overrides CRANSCOPE_BIND)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Keyword search over titles and descriptions
    Search {
        /// Search query, e.g. "time series"
        query: String,

        /// Also list substring matches after whole-word matches
        #[arg(long)]
        partial: bool,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Author and maintainer search
    Authors {
        /// Person name, "First Last" or "Last, First"
        name: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Estimate download rank for packages
    Rank {
        /// Package names
        #[arg(required = true)]
        packages: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Packages whose downloads grew most over the last three months
    Trending {
        /// Number of packages to show
        #[arg(short, long)]
        limit: Option<usize>,

        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Summarise a snapshot file
    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "cranscope", "search", "time series", "--limit", "5", "--offset", "10", "--offline",
        ])
        .unwrap();
        match cli.command {
            Commands::Search { query, page, source, partial } => {
                assert_eq!(query, "time series");
                assert_eq!(page.limit, Some(5));
                assert_eq!(page.offset, 10);
                assert!(source.offline);
                assert!(!partial);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_trending_with_bioc_stats() {
        let cli = Cli::try_parse_from([
            "cranscope", "trending", "-l", "5", "--bioc-stats", "stats.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Trending { limit, source, json } => {
                assert_eq!(limit, Some(5));
                assert_eq!(source.bioc_stats, Some(PathBuf::from("stats.json")));
                assert!(!json);
            }
            _ => panic!("expected trending"),
        }
    }
}
