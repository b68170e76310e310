//! Header row detection
//!
//! Exported sheets often carry titles, GSTIN banners, or blank rows above
//! the real header. Each candidate row is scored by how many of its cells
//! name a known field; the best row wins.

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{normalize_header, CellValue, FieldDictionary, HeaderMap};

/// Outcome of header detection for one source document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDetection {
    /// 0-based index of the chosen row
    pub row_index: usize,
    /// Number of recognized cells in the chosen row
    pub matches: usize,
    /// True when no row reached the threshold and row 0 was used
    pub low_confidence: bool,
    #[serde(skip)]
    pub header_map: HeaderMap,
}

/// Scores candidate rows against a field dictionary
#[derive(Debug, Clone)]
pub struct HeaderResolver {
    scan_rows: usize,
    min_matches: usize,
}

impl Default for HeaderResolver {
    fn default() -> Self {
        Self::new(20, 3)
    }
}

impl HeaderResolver {
    pub fn new(scan_rows: usize, min_matches: usize) -> Self {
        Self { scan_rows, min_matches }
    }

    /// Count cells of `row` that name a dictionary field
    pub fn score(row: &[CellValue], dictionary: &FieldDictionary) -> usize {
        row.iter()
            .filter(|cell| dictionary.contains(&normalize_header(&cell.display_text())))
            .count()
    }

    /// Pick the header row among the first rows of a document
    ///
    /// Ties keep the earliest row. Below the threshold, row 0 is used and
    /// the result is flagged low-confidence.
    pub fn detect(&self, rows: &[Vec<CellValue>], dictionary: &FieldDictionary) -> HeaderDetection {
        let mut best: Option<(usize, usize)> = None;

        for (index, row) in rows.iter().take(self.scan_rows).enumerate() {
            let score = Self::score(row, dictionary);
            if score >= self.min_matches && best.map_or(true, |(_, s)| score > s) {
                best = Some((index, score));
            }
        }

        let (row_index, matches, low_confidence) = match best {
            Some((index, score)) => (index, score, false),
            None => {
                let score = rows.first().map_or(0, |row| Self::score(row, dictionary));
                warn!(
                    kind = %dictionary.kind(),
                    scanned = rows.len().min(self.scan_rows),
                    "No header row reached {} matches; falling back to row 0",
                    self.min_matches
                );
                (0, score, true)
            }
        };

        let header_map = rows
            .get(row_index)
            .map(|row| Self::build_map(row, dictionary))
            .unwrap_or_default();

        debug!(row_index, matches, columns = header_map.len(), "Header row selected");

        HeaderDetection {
            row_index,
            matches,
            low_confidence,
            header_map,
        }
    }

    /// Map each recognized column of a header row to its field
    pub fn build_map(row: &[CellValue], dictionary: &FieldDictionary) -> HeaderMap {
        row.iter()
            .enumerate()
            .filter_map(|(index, cell)| {
                dictionary
                    .get(&normalize_header(&cell.display_text()))
                    .map(|field| (index, field))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentKind, Field};

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::text(*c)).collect()
    }

    fn dict() -> FieldDictionary {
        FieldDictionary::for_kind(DocumentKind::B2b)
    }

    #[test]
    fn test_skips_title_rows() {
        let rows = vec![
            row(&["Sales Register - January 2024"]),
            row(&["GSTIN: 27AAPFU0939F1ZV", "", "Period: 012024"]),
            row(&["GSTIN/UIN of Recipient", "Invoice No.", "Invoice Date", "Taxable Value*", "Rate"]),
            row(&["29AABCT1332L1ZU", "INV-1", "15/01/2024", "1000", "18"]),
        ];

        let detection = HeaderResolver::default().detect(&rows, &dict());
        assert_eq!(detection.row_index, 2);
        assert_eq!(detection.matches, 5);
        assert!(!detection.low_confidence);
        assert_eq!(detection.header_map.get(&1), Some(&Field::InvoiceNumber));
        assert_eq!(detection.header_map.get(&3), Some(&Field::TaxableValue));
    }

    #[test]
    fn test_tie_keeps_earliest_row() {
        let rows = vec![
            row(&["junk"]),
            row(&["gstin", "invoice no", "rate"]),
            row(&["gstin", "invoice no", "cess"]),
        ];
        let detection = HeaderResolver::default().detect(&rows, &dict());
        assert_eq!(detection.row_index, 1);
    }

    #[test]
    fn test_strictly_better_later_row_wins() {
        let rows = vec![
            row(&["gstin", "invoice no", "rate"]),
            row(&["gstin", "invoice no", "rate", "taxable value"]),
        ];
        let detection = HeaderResolver::default().detect(&rows, &dict());
        assert_eq!(detection.row_index, 1);
        assert_eq!(detection.matches, 4);
    }

    #[test]
    fn test_fallback_to_row_zero_below_threshold() {
        let rows = vec![
            row(&["gstin", "whatever"]),
            row(&["invoice no", "rate", "unknown"]),
        ];
        let detection = HeaderResolver::default().detect(&rows, &dict());
        assert_eq!(detection.row_index, 0);
        assert!(detection.low_confidence);
        assert_eq!(detection.header_map.get(&0), Some(&Field::Gstin));
        assert_eq!(detection.header_map.len(), 1);
    }

    #[test]
    fn test_only_scans_configured_rows() {
        let mut rows: Vec<Vec<CellValue>> = (0..5).map(|_| row(&["x"])).collect();
        rows.push(row(&["gstin", "invoice no", "rate", "cess"]));

        let detection = HeaderResolver::new(5, 3).detect(&rows, &dict());
        assert!(detection.low_confidence);

        let detection = HeaderResolver::new(6, 3).detect(&rows, &dict());
        assert_eq!(detection.row_index, 5);
    }

    #[test]
    fn test_empty_document() {
        let detection = HeaderResolver::default().detect(&[], &dict());
        assert!(detection.low_confidence);
        assert!(detection.header_map.is_empty());
    }
}
