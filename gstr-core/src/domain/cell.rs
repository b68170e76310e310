//! Cell values read from tabular sources
//!
//! Spreadsheets hand back several cell shapes. Each shape is its own
//! variant with its own extraction arm, so nothing downstream has to guess
//! what kind of value it is holding.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cell of a source row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A native calendar date
    Date(NaiveDate),
    /// Formula cell; only the cached result is meaningful to the pipeline
    Formula {
        formula: String,
        result: Box<CellValue>,
    },
    /// Rich text made of styled runs
    RichText(Vec<String>),
    /// Hyperlink cell; the display text is the value
    Hyperlink { text: String, target: String },
    /// Spreadsheet error value such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Unwrap formula cells down to the value they evaluated to
    pub fn resolved(&self) -> &CellValue {
        match self {
            Self::Formula { result, .. } => result.resolved(),
            other => other,
        }
    }

    /// True when the cell carries nothing the pipeline can use
    pub fn is_blank(&self) -> bool {
        match self.resolved() {
            Self::Empty | Self::Error(_) => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::RichText(runs) => runs.iter().all(|r| r.trim().is_empty()),
            Self::Hyperlink { text, .. } => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Text as a user would see it in the cell
    pub fn display_text(&self) -> String {
        match self {
            Self::Empty | Self::Error(_) => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Self::Date(d) => d.format("%d-%m-%Y").to_string(),
            Self::Formula { result, .. } => result.display_text(),
            Self::RichText(runs) => runs.concat(),
            Self::Hyperlink { text, .. } => text.clone(),
        }
    }

    /// Numeric payload, if the cell holds a number
    pub fn as_number(&self) -> Option<f64> {
        match self.resolved() {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Native date payload, if the cell holds one
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self.resolved() {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Render spreadsheet numbers without a trailing `.0` on integers
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One source row keyed by column position
pub type RawRow = BTreeMap<usize, CellValue>;

/// Build a [`RawRow`] from a positional list of cells, dropping empties
pub fn raw_row(cells: impl IntoIterator<Item = CellValue>) -> RawRow {
    cells
        .into_iter()
        .enumerate()
        .filter(|(_, c)| !matches!(c, CellValue::Empty))
        .collect()
}
