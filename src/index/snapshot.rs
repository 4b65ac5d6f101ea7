// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk snapshot formats.
//!
//! Two shapes exist in the wild. The canonical one is a list of records. The
//! legacy one is what the ETL scripts write for `cran-descriptions.json`: a
//! map from package name to metadata, with Bioconductor views as a single
//! comma-separated string. Both are parsed with one untagged enum and
//! normalized into `Snapshot` here, so nothing past the loader knows the
//! legacy shape exists.

use crate::types::PackageRecord;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A normalized snapshot: records in file order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub last_updated: Option<String>,
    pub records: Vec<PackageRecord>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum SnapshotFile {
    /// `{ "packages": [ {name, title, ...} ] }`
    Canonical {
        #[serde(default, rename = "lastUpdated")]
        last_updated: Option<String>,
        packages: Vec<PackageRecord>,
    },
    /// `{ "packageData": { "<name>": {title, ...} } }`
    Legacy {
        #[serde(default, rename = "lastUpdated")]
        last_updated: Option<String>,
        #[serde(rename = "packageData")]
        package_data: BTreeMap<String, LegacyEntry>,
    },
    /// A bare array of records.
    List(Vec<PackageRecord>),
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct LegacyEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub maintainer: Option<String>,
    #[serde(default)]
    pub bioc_views: Option<String>,
}

impl LegacyEntry {
    fn into_record(self, name: String) -> PackageRecord {
        PackageRecord {
            name,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            maintainer: self.maintainer.unwrap_or_default(),
            category_tags: self
                .bioc_views
                .as_deref()
                .map(split_views)
                .unwrap_or_default(),
        }
    }
}

/// "Software, GeneExpression,RNASeq" -> ["Software", "GeneExpression", "RNASeq"]
pub fn split_views(views: &str) -> Vec<String> {
    views
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

impl From<SnapshotFile> for Snapshot {
    fn from(file: SnapshotFile) -> Self {
        match file {
            SnapshotFile::Canonical {
                last_updated,
                packages,
            } => Snapshot {
                last_updated,
                records: packages,
            },
            SnapshotFile::Legacy {
                last_updated,
                package_data,
            } => Snapshot {
                last_updated,
                records: package_data
                    .into_iter()
                    .map(|(name, entry)| entry.into_record(name))
                    .collect(),
            },
            SnapshotFile::List(records) => Snapshot {
                last_updated: None,
                records,
            },
        }
    }
}

/// Parse either snapshot shape.
pub fn parse(json: &str) -> Result<Snapshot, serde_json::Error> {
    serde_json::from_str::<SnapshotFile>(json).map(Snapshot::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        let json = r#"{
            "lastUpdated": "2025-01-01",
            "packages": [
                {"name": "zoo", "title": "S3 Infrastructure for Time Series", "categoryTags": ["TimeSeries"]},
                {"name": "xts"}
            ]
        }"#;
        let snap = parse(json).unwrap();
        assert_eq!(snap.last_updated.as_deref(), Some("2025-01-01"));
        assert_eq!(snap.records.len(), 2);
        assert_eq!(snap.records[0].category_tags, vec!["TimeSeries"]);
        assert_eq!(snap.records[1].title, "");
    }

    #[test]
    fn test_parse_legacy_package_data() {
        let json = r#"{
            "lastUpdated": "2024-06-30",
            "packageData": {
                "limma": {
                    "title": "Linear Models for Microarray Data",
                    "maintainer": "Gordon Smyth <smyth@wehi.edu.au>",
                    "biocViews": "Software, Microarray,  DifferentialExpression"
                }
            }
        }"#;
        let snap = parse(json).unwrap();
        assert_eq!(snap.records.len(), 1);
        let limma = &snap.records[0];
        assert_eq!(limma.name, "limma");
        assert_eq!(limma.author, "");
        assert_eq!(
            limma.category_tags,
            vec!["Software", "Microarray", "DifferentialExpression"]
        );
    }

    #[test]
    fn test_parse_bare_list() {
        let snap = parse(r#"[{"name": "ts"}]"#).unwrap();
        assert_eq!(snap.records[0].name, "ts");
    }

    #[test]
    fn test_reject_unknown_shape() {
        assert!(parse(r#"{"docs": []}"#).is_err());
        assert!(parse("not json").is_err());
    }

    #[test]
    fn test_split_views_drops_empties() {
        assert_eq!(split_views(" , A,,B "), vec!["A", "B"]);
        assert!(split_views("").is_empty());
    }
}
