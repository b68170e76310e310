//! Folding validated line rows into invoices and notes

use std::collections::HashMap;

use tracing::debug;

use super::dedup::DuplicateTracker;
use crate::config::DeclaredValuePolicy;
use crate::domain::{Document, DocumentKey, DocumentKind, ValidatedRow};

/// What happened to a row handed to [`DocumentGrouper::fold`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    /// The row opened a new document
    Opened,
    /// The row was appended to a document already open in this grouper
    Appended,
    /// The row's number was already recorded by the tracker
    Duplicate,
}

/// Message attached to a row rejected as a duplicate
pub fn duplicate_message(kind: DocumentKind, number: &str) -> String {
    format!("{} - duplicate document number {}", kind.number_field(), number)
}

/// Groups the rows of one source into documents keyed by
/// (counterparty, number)
///
/// Running totals always equal the sum of the lines. The declared value
/// follows the configured [`DeclaredValuePolicy`].
#[derive(Debug)]
pub struct DocumentGrouper {
    policy: DeclaredValuePolicy,
    documents: Vec<Document>,
    index: HashMap<DocumentKey, usize>,
}

impl DocumentGrouper {
    pub fn new(policy: DeclaredValuePolicy) -> Self {
        Self {
            policy,
            documents: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Fold one row
    ///
    /// The tracker is consulted only when the row's key is new to this
    /// grouper, so later lines of an open document are never duplicates.
    pub fn fold(&mut self, row: ValidatedRow, tracker: &mut DuplicateTracker) -> Fold {
        let key = DocumentKey {
            counterparty_gstin: row.header.counterparty_gstin.clone(),
            number: row.header.number.clone(),
        };

        if let Some(&position) = self.index.get(&key) {
            let document = &mut self.documents[position];
            let line_total = row.line.line_total();
            document.push_line(row.line);
            document.header.value = match self.policy {
                DeclaredValuePolicy::SumOfLines => document.lines_total(),
                DeclaredValuePolicy::Incremental => document.header.value + line_total,
            };
            return Fold::Appended;
        }

        if !tracker.check_and_record(&key.number) {
            debug!(number = %key.number, "Duplicate document number rejected");
            return Fold::Duplicate;
        }

        self.index.insert(key, self.documents.len());
        self.documents.push(Document::from_row(row));
        Fold::Opened
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in the order their first row was seen
    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::{DocumentHeader, LineItem, TaxTotals};

    fn row(gstin: &str, number: &str, value: i64, taxable: i64, igst: i64) -> ValidatedRow {
        let mut line = LineItem::new(Decimal::new(18, 0), Decimal::new(taxable, 0));
        line.igst_amount = Decimal::new(igst, 0);
        ValidatedRow {
            header: DocumentHeader {
                kind: DocumentKind::B2b,
                counterparty_gstin: gstin.to_string(),
                receiver_name: None,
                number: number.to_string(),
                date: "15-01-2024".to_string(),
                value: Decimal::new(value, 0),
                place_of_supply: "29".to_string(),
                reverse_charge: false,
                invoice_type: "R".to_string(),
                note_type: None,
            },
            line,
        }
    }

    const GSTIN: &str = "29AABCT1332L1ZU";

    #[test]
    fn test_rows_sharing_a_key_fold_into_one_document() {
        let mut tracker = DuplicateTracker::new();
        let mut grouper = DocumentGrouper::new(DeclaredValuePolicy::SumOfLines);

        assert_eq!(grouper.fold(row(GSTIN, "INV-1", 1180, 1000, 180), &mut tracker), Fold::Opened);
        assert_eq!(grouper.fold(row(GSTIN, "INV-1", 590, 500, 90), &mut tracker), Fold::Appended);

        let docs = grouper.into_documents();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].lines.len(), 2);
        assert_eq!(docs[0].totals, TaxTotals::from_lines(&docs[0].lines));
        assert_eq!(docs[0].totals.taxable_value, Decimal::new(1500, 0));
        assert_eq!(docs[0].header.value, Decimal::new(1770, 0));
    }

    #[test]
    fn test_incremental_value_adds_line_totals() {
        let mut tracker = DuplicateTracker::new();
        let mut grouper = DocumentGrouper::new(DeclaredValuePolicy::Incremental);

        grouper.fold(row(GSTIN, "INV-1", 1770, 1000, 180), &mut tracker);
        grouper.fold(row(GSTIN, "INV-1", 1770, 500, 90), &mut tracker);

        assert_eq!(grouper.documents()[0].header.value, Decimal::new(2360, 0));
    }

    #[test]
    fn test_single_line_value_is_kept() {
        let mut tracker = DuplicateTracker::new();
        let mut grouper = DocumentGrouper::new(DeclaredValuePolicy::SumOfLines);
        grouper.fold(row(GSTIN, "INV-9", 1181, 1000, 180), &mut tracker);
        assert_eq!(grouper.documents()[0].header.value, Decimal::new(1181, 0));
    }

    #[test]
    fn test_number_reused_for_other_counterparty_is_duplicate() {
        let mut tracker = DuplicateTracker::new();
        let mut grouper = DocumentGrouper::new(DeclaredValuePolicy::SumOfLines);

        grouper.fold(row(GSTIN, "INV-1", 1180, 1000, 180), &mut tracker);
        let outcome = grouper.fold(row("27AAPFU0939F1ZV", "inv-1", 1180, 1000, 180), &mut tracker);

        assert_eq!(outcome, Fold::Duplicate);
        assert_eq!(grouper.len(), 1);
    }

    #[test]
    fn test_tracker_spans_groupers() {
        let mut tracker = DuplicateTracker::new();
        let mut first = DocumentGrouper::new(DeclaredValuePolicy::SumOfLines);
        let mut second = DocumentGrouper::new(DeclaredValuePolicy::SumOfLines);

        first.fold(row(GSTIN, "INV-1", 1180, 1000, 180), &mut tracker);
        let outcome = second.fold(row(GSTIN, "INV-1", 1180, 1000, 180), &mut tracker);

        assert_eq!(outcome, Fold::Duplicate);
        assert!(second.is_empty());
    }

    #[test]
    fn test_duplicate_message() {
        assert_eq!(
            duplicate_message(DocumentKind::Cdnr, "CN-1"),
            "noteNumber - duplicate document number CN-1"
        );
    }
}
