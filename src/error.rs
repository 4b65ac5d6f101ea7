// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! Only two kinds of failure ever reach an HTTP caller: a broken pattern and
//! an internal error. Upstream download-source failures stop at the
//! popularity oracle, and a missing snapshot stops at the index fallback.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Snapshot file missing or unreadable
    #[error("snapshot {path}: {reason}")]
    Snapshot { path: PathBuf, reason: String },

    /// Download-count source failure
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A match pattern failed to compile
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn snapshot(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Snapshot {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Failures talking to the download-count source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request for {package} failed: {message}")]
    Request { package: String, message: String },

    #[error("request for {package} timed out")]
    Timeout { package: String },

    #[error("unexpected status {status} for {package}")]
    Status { package: String, status: u16 },

    #[error("malformed response for {package}: {message}")]
    Decode { package: String, message: String },

    #[error("download source unavailable")]
    Unavailable,
}

impl SourceError {
    pub fn from_reqwest(package: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout {
                package: package.to_string(),
            };
        }
        if let Some(status) = err.status() {
            return Self::Status {
                package: package.to_string(),
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return Self::Decode {
                package: package.to_string(),
                message: err.to_string(),
            };
        }
        Self::Request {
            package: package.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_error_names_path() {
        let err = Error::snapshot("/data/cran.json", "No such file");
        assert_eq!(err.to_string(), "snapshot /data/cran.json: No such file");
    }

    #[test]
    fn test_source_error_is_transparent() {
        let err: Error = SourceError::Timeout {
            package: "ggplot2".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "request for ggplot2 timed out");
    }
}
