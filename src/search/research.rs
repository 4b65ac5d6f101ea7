// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Research-area browsing: a curated keyword list per area, scored by where
//! each keyword appears.
//!
//! | Field | Points per keyword |
//! |-------|--------------------|
//! | title | 3 |
//! | category tags | 2 |
//! | description | 1 |
//!
//! Each keyword counts once, in the highest field it appears in. Keywords are
//! stems ("sequenc", "immun"), so matching is by substring.

use crate::index::PackageIndex;
use crate::popularity::PopularityLookup;
use crate::scoring::ranking::compare_names;
use crate::types::{PackageRecord, PopularityTier};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RESEARCH_LIMIT: usize = 20;

const TITLE_POINTS: u32 = 3;
const TAG_POINTS: u32 = 2;
const DESCRIPTION_POINTS: u32 = 1;

const AREAS: [(&str, &[&str]); 15] = [
    ("genomics", &["genomic", "genome", "dna", "sequence", "variant", "snp", "chromosom", "assembly", "alignment", "mapping"]),
    ("rnaseq", &["rna", "expression", "differential", "transcript", "gene", "rnaseq", "rna-seq", "deseq", "edger", "limma"]),
    ("proteomics", &["protein", "proteom", "mass", "spectr", "peptide", "msms", "maldi", "quantit", "identification"]),
    ("microarray", &["array", "affy", "probe", "chip", "microarray", "affymetrix", "illumina", "normalization", "preprocessing"]),
    ("cytometry", &["flow", "cytometry", "cell", "population", "facs", "sorting", "phenotyping", "immunology", "flowcytometry"]),
    ("metabolomics", &["metabol", "compound", "chemical", "metabolite", "lcms", "gcms", "xcms", "pathway", "biochemical"]),
    ("singlecell", &["single", "cell", "singlecell", "scrnaseq", "scrna", "seurat", "monocle", "trajectory", "clustering"]),
    ("epigenomics", &["epigen", "methylation", "histone", "chromatin", "chip", "chipseq", "atac", "dnase", "modification"]),
    ("annotation", &["annotation", "database", "organism", "gene", "ontology", "pathway", "enrichment", "mapping"]),
    ("visualization", &["visual", "plot", "graph", "chart", "heatmap", "ggplot", "interactive", "shiny", "graphics"]),
    ("statistics", &["statistic", "analysis", "test", "model", "regression", "classification", "clustering", "machine"]),
    ("sequencing", &["sequenc", "ngs", "reads", "quality", "trimming", "adapter", "fastq", "alignment", "mapping"]),
    ("cancer", &["cancer", "tumor", "oncology", "tcga", "mutation", "somatic", "driver", "biomarker", "therapeutic"]),
    ("immunology", &["immun", "antibody", "antigen", "tcell", "bcell", "vaccine", "hla", "mhc", "autoimmune"]),
    ("neuroscience", &["neuro", "brain", "neural", "synaptic", "cognitive", "neuronal", "cortex", "neurodegenerative"]),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchEntry {
    pub package: String,
    pub title: String,
    pub description: String,
    pub maintainer: String,
    pub category_tags: Vec<String>,
    pub relevance_score: u32,
    pub total_downloads: u64,
    pub popularity_tier: PopularityTier,
    pub ranking_basis: String,
    pub download_rank: usize,
}

/// Known area names, in table order.
pub fn research_areas() -> impl Iterator<Item = &'static str> {
    AREAS.iter().map(|(area, _)| *area)
}

/// Keywords for `area`. An unknown area searches for itself.
pub fn area_keywords(area: &str) -> Vec<String> {
    let area = area.trim().to_lowercase();
    AREAS
        .iter()
        .find(|(name, _)| *name == area)
        .map(|(_, keywords)| keywords.iter().map(|k| k.to_string()).collect())
        .unwrap_or_else(|| vec![area])
}

/// Relevance of `record` for `keywords` (already lowercase).
pub fn relevance(record: &PackageRecord, keywords: &[String]) -> u32 {
    let title = record.title.to_lowercase();
    let tags = record.category_tags.join(", ").to_lowercase();
    let description = record.description.to_lowercase();

    keywords
        .iter()
        .map(|k| {
            if title.contains(k.as_str()) {
                TITLE_POINTS
            } else if tags.contains(k.as_str()) {
                TAG_POINTS
            } else if description.contains(k.as_str()) {
                DESCRIPTION_POINTS
            } else {
                0
            }
        })
        .sum()
}

/// Packages relevant to `area`, most downloaded first, then most relevant.
pub async fn search_research_area(
    index: &PackageIndex,
    popularity: &dyn PopularityLookup,
    area: &str,
    limit: usize,
) -> Vec<ResearchEntry> {
    if area.trim().is_empty() {
        return Vec::new();
    }
    let keywords = area_keywords(area);
    let matching: Vec<(&PackageRecord, u32)> = index
        .all()
        .map(|r| (r, relevance(r, &keywords)))
        .filter(|(_, score)| *score > 0)
        .collect();

    let names: Vec<String> = matching.iter().map(|(r, _)| r.name.clone()).collect();
    let downloads = popularity.downloads_of(&names).await;

    let mut rows: Vec<_> = matching
        .into_iter()
        .zip(downloads)
        .map(|((record, score), d)| (record, score, d))
        .collect();
    rows.sort_by(|a, b| {
        b.2.cmp(&a.2)
            .then_with(|| b.1.cmp(&a.1))
            .then_with(|| compare_names(&a.0.name, &b.0.name))
    });

    rows.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (record, relevance_score, total_downloads))| ResearchEntry {
            package: record.name.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            maintainer: record.maintainer.clone(),
            category_tags: record.category_tags.clone(),
            relevance_score,
            total_downloads,
            popularity_tier: popularity.tier(total_downloads),
            ranking_basis: if total_downloads > 0 {
                "Downloads + Relevance".to_string()
            } else {
                "Relevance Only".to_string()
            },
            download_rank: i + 1,
        })
        .collect()
}
