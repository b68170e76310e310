//! Configuration management
//!
//! Stored in `settings.json` inside the gstr directory:
//! ```json
//! {
//!   "pipeline": { "duplicateScope": "batch", "declaredValue": "sumOfLines", ... },
//!   "sheetKeywords": { "b2b": ["b2b", "invoice"], "cdnr": ["cdnr", "note"] }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::DocumentKind;

/// How far the duplicate tracker's memory reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicateScope {
    /// One key set for every file of a batch
    #[default]
    Batch,
    /// A fresh key set per file
    File,
}

/// How a multi-line document's declared value is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclaredValuePolicy {
    /// Value is the sum of every line's taxable value and tax
    #[default]
    SumOfLines,
    /// First row's value is kept; each later line's total is added on top
    Incremental,
}

/// Ordering used to find the bounds of a numbering series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RangeOrdering {
    #[default]
    Lexical,
    /// Digit runs compare by numeric value (`INV-9` < `INV-10`)
    Natural,
}

/// Resolution of `NN-NN-YYYY` strings whose first token is 12 or less
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmbiguousDates {
    /// Read as month-day-year and swap to day-month-year
    #[default]
    MonthFirst,
    /// Read as day-month-year, never swap
    DayFirst,
}

/// Pipeline tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSettings {
    #[serde(default = "default_scan_rows")]
    pub header_scan_rows: usize,
    #[serde(default = "default_min_matches")]
    pub min_header_matches: usize,
    #[serde(default)]
    pub duplicate_scope: DuplicateScope,
    #[serde(default)]
    pub declared_value: DeclaredValuePolicy,
    #[serde(default)]
    pub range_ordering: RangeOrdering,
    #[serde(default)]
    pub ambiguous_dates: AmbiguousDates,
}

fn default_scan_rows() -> usize {
    20
}

fn default_min_matches() -> usize {
    3
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            header_scan_rows: default_scan_rows(),
            min_header_matches: default_min_matches(),
            duplicate_scope: DuplicateScope::default(),
            declared_value: DeclaredValuePolicy::default(),
            range_ordering: RangeOrdering::default(),
            ambiguous_dates: AmbiguousDates::default(),
        }
    }
}

/// Sheet-name keywords per document kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetKeywords {
    #[serde(default = "default_b2b_keywords")]
    pub b2b: Vec<String>,
    #[serde(default = "default_cdnr_keywords")]
    pub cdnr: Vec<String>,
}

fn default_b2b_keywords() -> Vec<String> {
    ["b2b", "invoice", "sales"].iter().map(|s| s.to_string()).collect()
}

fn default_cdnr_keywords() -> Vec<String> {
    ["cdnr", "credit", "debit", "note"].iter().map(|s| s.to_string()).collect()
}

impl Default for SheetKeywords {
    fn default() -> Self {
        Self {
            b2b: default_b2b_keywords(),
            cdnr: default_cdnr_keywords(),
        }
    }
}

impl SheetKeywords {
    pub fn for_kind(&self, kind: DocumentKind) -> &[String] {
        match kind {
            DocumentKind::B2b => &self.b2b,
            DocumentKind::Cdnr => &self.cdnr,
        }
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    pipeline: PipelineSettings,
    #[serde(default)]
    sheet_keywords: SheetKeywords,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// gstr configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub pipeline: PipelineSettings,
    pub sheet_keywords: SheetKeywords,
}

impl Config {
    /// Load config from the gstr directory
    ///
    /// Environment overrides (for CI and one-off runs):
    /// - `GSTR_DUPLICATE_SCOPE` = `batch` | `file`
    /// - `GSTR_RANGE_ORDERING` = `lexical` | `natural`
    pub fn load(gstr_dir: &Path) -> Result<Self> {
        let settings_path = gstr_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {:?}", settings_path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings file {:?}", settings_path))?
        } else {
            SettingsFile::default()
        };

        let mut pipeline = raw.pipeline;

        match std::env::var("GSTR_DUPLICATE_SCOPE").ok().as_deref() {
            Some("batch" | "BATCH") => pipeline.duplicate_scope = DuplicateScope::Batch,
            Some("file" | "FILE") => pipeline.duplicate_scope = DuplicateScope::File,
            _ => {}
        }

        match std::env::var("GSTR_RANGE_ORDERING").ok().as_deref() {
            Some("lexical" | "LEXICAL") => pipeline.range_ordering = RangeOrdering::Lexical,
            Some("natural" | "NATURAL") => pipeline.range_ordering = RangeOrdering::Natural,
            _ => {}
        }

        Ok(Self {
            pipeline,
            sheet_keywords: raw.sheet_keywords,
        })
    }

    /// Save config to the gstr directory, keeping unmanaged keys
    pub fn save(&self, gstr_dir: &Path) -> Result<()> {
        let settings_path = gstr_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.pipeline = self.pipeline.clone();
        settings.sheet_keywords = self.sheet_keywords.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}
