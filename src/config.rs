// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration.
//!
//! Defaults reproduce the dashboard's production values. `Config::from_env`
//! overlays `CRANSCOPE_*` variables; CLI flags are applied on top by the
//! binary. Unparsable numeric values keep the default. An unknown cache
//! policy is rejected, since silently changing pagination semantics is worse
//! than refusing to start.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CRANLOGS_URL: &str = "https://cranlogs.r-pkg.org";

/// How the result cursor caches search output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    /// Cache the whole sorted list once per query; pages are slices of it.
    #[default]
    FullList,
    /// Cache each (offset, limit) page independently.
    PerPage,
}

impl FromStr for CachePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full-list" | "full" => Ok(CachePolicy::FullList),
            "per-page" | "page" => Ok(CachePolicy::PerPage),
            other => Err(Error::config(format!(
                "unknown cache policy '{other}' (expected full-list or per-page)"
            ))),
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CachePolicy::FullList => "full-list",
            CachePolicy::PerPage => "per-page",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub bind: String,
    pub snapshot: Option<PathBuf>,
    /// Bioconductor download statistics used by the browse views.
    pub bioc_stats: Option<PathBuf>,
    pub cranlogs_url: String,
    pub popularity_ttl_secs: u64,
    pub fallback_ttl_secs: u64,
    pub result_ttl_secs: u64,
    pub names_ttl_secs: u64,
    pub research_ttl_secs: u64,
    pub trending_ttl_secs: u64,
    pub cache_policy: CachePolicy,
    pub default_limit: usize,
    pub max_limit: usize,
    pub enrichment_concurrency: usize,
    pub primary_timeout_ms: u64,
    pub fallback_timeout_ms: u64,
    pub primary_window_days: u32,
    pub fallback_window_days: u32,
    pub fallback_multiplier: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3001".to_string(),
            snapshot: None,
            bioc_stats: None,
            cranlogs_url: DEFAULT_CRANLOGS_URL.to_string(),
            popularity_ttl_secs: 2 * 60 * 60,
            fallback_ttl_secs: 60 * 60,
            result_ttl_secs: 30 * 60,
            names_ttl_secs: 30 * 60,
            research_ttl_secs: 60 * 60,
            trending_ttl_secs: 2 * 60 * 60,
            cache_policy: CachePolicy::FullList,
            default_limit: 20,
            max_limit: 100,
            enrichment_concurrency: 64,
            primary_timeout_ms: 5_000,
            fallback_timeout_ms: 3_000,
            primary_window_days: 365,
            fallback_window_days: 30,
            fallback_multiplier: 12,
        }
    }
}

impl Config {
    /// Defaults overlaid with `CRANSCOPE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let var = |name: &str| lookup(&format!("CRANSCOPE_{name}"));
        let num_u64 = |name: &str, default: u64| {
            var(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };
        let num_u32 = |name: &str, default: u32| {
            var(name)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(default)
        };
        let num_usize = |name: &str, default: usize| {
            var(name)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(default)
        };

        let cache_policy = match var("CACHE_POLICY") {
            Some(v) => v.parse()?,
            None => d.cache_policy,
        };

        let config = Self {
            bind: var("BIND").filter(|v| !v.trim().is_empty()).unwrap_or(d.bind),
            snapshot: var("SNAPSHOT")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .or(d.snapshot),
            bioc_stats: var("BIOC_STATS")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .or(d.bioc_stats),
            cranlogs_url: var("CRANLOGS_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(d.cranlogs_url),
            popularity_ttl_secs: num_u64("POPULARITY_TTL_SECS", d.popularity_ttl_secs),
            fallback_ttl_secs: num_u64("FALLBACK_TTL_SECS", d.fallback_ttl_secs),
            result_ttl_secs: num_u64("RESULT_TTL_SECS", d.result_ttl_secs),
            names_ttl_secs: num_u64("NAMES_TTL_SECS", d.names_ttl_secs),
            research_ttl_secs: num_u64("RESEARCH_TTL_SECS", d.research_ttl_secs),
            trending_ttl_secs: num_u64("TRENDING_TTL_SECS", d.trending_ttl_secs),
            cache_policy,
            default_limit: num_usize("DEFAULT_LIMIT", d.default_limit),
            max_limit: num_usize("MAX_LIMIT", d.max_limit),
            enrichment_concurrency: num_usize("ENRICHMENT_CONCURRENCY", d.enrichment_concurrency),
            primary_timeout_ms: num_u64("PRIMARY_TIMEOUT_MS", d.primary_timeout_ms),
            fallback_timeout_ms: num_u64("FALLBACK_TIMEOUT_MS", d.fallback_timeout_ms),
            primary_window_days: num_u32("PRIMARY_WINDOW_DAYS", d.primary_window_days),
            fallback_window_days: num_u32("FALLBACK_WINDOW_DAYS", d.fallback_window_days),
            fallback_multiplier: num_u64("FALLBACK_MULTIPLIER", d.fallback_multiplier),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that cannot serve a page.
    pub fn validate(&self) -> Result<()> {
        if self.default_limit == 0 || self.max_limit == 0 {
            return Err(Error::config("limits must be positive"));
        }
        if self.default_limit > self.max_limit {
            return Err(Error::config(format!(
                "default limit {} exceeds max limit {}",
                self.default_limit, self.max_limit
            )));
        }
        if self.enrichment_concurrency == 0 {
            return Err(Error::config("enrichment concurrency must be positive"));
        }
        if self.primary_window_days == 0 || self.fallback_window_days == 0 {
            return Err(Error::config("download windows must span at least one day"));
        }
        Ok(())
    }

    pub fn popularity_ttl(&self) -> Duration {
        Duration::from_secs(self.popularity_ttl_secs)
    }

    pub fn fallback_ttl(&self) -> Duration {
        Duration::from_secs(self.fallback_ttl_secs)
    }

    pub fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_ttl_secs)
    }

    pub fn names_ttl(&self) -> Duration {
        Duration::from_secs(self.names_ttl_secs)
    }

    pub fn research_ttl(&self) -> Duration {
        Duration::from_secs(self.research_ttl_secs)
    }

    pub fn trending_ttl(&self) -> Duration {
        Duration::from_secs(self.trending_ttl_secs)
    }

    pub fn primary_timeout(&self) -> Duration {
        Duration::from_millis(self.primary_timeout_ms)
    }

    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }
}
