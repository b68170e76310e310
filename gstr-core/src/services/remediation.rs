//! Rejected-row remediation
//!
//! A rejected row either stays rejected, is promoted after the user fixes
//! it, or is discarded. Promotion is one-way.

use serde::Serialize;
use uuid::Uuid;

use super::validate::RowValidator;
use crate::domain::result::{Error, Result};
use crate::domain::{CleanedRow, Document, RowError};

/// A rejected row awaiting a decision
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRow {
    pub id: Uuid,
    #[serde(flatten)]
    pub error: RowError,
}

/// Result of re-validating an edited row
#[derive(Debug, Clone, PartialEq)]
pub enum Promotion {
    /// The row passed and became a new single-line document
    Promoted { document: Document, was_duplicate: bool },
    /// The edit still fails; the row stays queued with these messages
    StillRejected(Vec<String>),
}

/// Rejected rows of one import, in the order they were rejected
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RemediationQueue {
    rows: Vec<PendingRow>,
}

impl RemediationQueue {
    pub fn new(errors: impl IntoIterator<Item = RowError>) -> Self {
        let mut queue = Self::default();
        queue.extend(errors);
        queue
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = RowError>) {
        self.rows.extend(errors.into_iter().map(|error| PendingRow {
            id: Uuid::new_v4(),
            error,
        }));
    }

    pub fn rows(&self) -> &[PendingRow] {
        &self.rows
    }

    pub fn get(&self, id: Uuid) -> Option<&PendingRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.rows
            .iter()
            .position(|row| row.id == id)
            .ok_or_else(|| Error::Other(format!("No rejected row with id {}", id)))
    }

    /// Re-validate `edited` in place of the row's data
    ///
    /// On success the row leaves the queue and a fresh document is
    /// returned; it is not folded into an existing document with the same
    /// key and the duplicate tracker is not consulted. On failure the row
    /// keeps the edited data and the new messages.
    pub fn promote(&mut self, id: Uuid, edited: CleanedRow) -> Result<Promotion> {
        let position = self.position(id)?;
        let validator = RowValidator::new(self.rows[position].error.kind);

        match validator.validate(&edited) {
            Ok(validated) => {
                let pending = self.rows.remove(position);
                Ok(Promotion::Promoted {
                    document: Document::from_row(validated),
                    was_duplicate: pending.error.duplicate,
                })
            }
            Err(messages) => {
                let error = &mut self.rows[position].error;
                error.raw_data = edited;
                error.messages = messages.clone();
                error.duplicate = false;
                Ok(Promotion::StillRejected(messages))
            }
        }
    }

    /// Drop a row without re-validating it
    pub fn discard(&mut self, id: Uuid) -> Result<RowError> {
        let position = self.position(id)?;
        Ok(self.rows.remove(position).error)
    }

    pub fn into_errors(self) -> Vec<RowError> {
        self.rows.into_iter().map(|row| row.error).collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::{DocumentKind, Field};

    fn broken_row() -> CleanedRow {
        let mut row = CleanedRow::new();
        row.set_text(Field::Gstin, "29AABCT1332L1ZU");
        row.set_text(Field::InvoiceNumber, "INV-5");
        row.set_text(Field::InvoiceDate, "31-02-2024");
        row.set_number(Field::InvoiceValue, Decimal::new(1050, 0));
        row.set_text(Field::PlaceOfSupply, "29");
        row.set_number(Field::Rate, Decimal::new(5, 0));
        row.set_number(Field::TaxableValue, Decimal::new(1000, 0));
        row.set_number(Field::IgstAmount, Decimal::new(50, 0));
        row
    }

    fn queue() -> RemediationQueue {
        RemediationQueue::new([RowError {
            row_number: 4,
            source: "sales.csv".to_string(),
            kind: DocumentKind::B2b,
            raw_data: broken_row(),
            messages: vec!["invoiceDate - must be a valid date in DD-MM-YYYY format".to_string()],
            duplicate: false,
        }])
    }

    #[test]
    fn test_promote_fixed_row() {
        let mut queue = queue();
        let id = queue.rows()[0].id;

        let mut edited = broken_row();
        edited.set_text(Field::InvoiceDate, "28-02-2024");

        match queue.promote(id, edited).unwrap() {
            Promotion::Promoted { document, was_duplicate } => {
                assert_eq!(document.lines.len(), 1);
                assert_eq!(document.header.date, "28-02-2024");
                assert!(!was_duplicate);
            }
            other => panic!("expected promotion, got {:?}", other),
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_failed_promotion_keeps_row() {
        let mut queue = queue();
        let id = queue.rows()[0].id;

        let mut edited = broken_row();
        edited.set_text(Field::PlaceOfSupply, "X");

        let outcome = queue.promote(id, edited).unwrap();
        assert!(matches!(outcome, Promotion::StillRejected(ref m) if m.len() == 2));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.get(id).unwrap().error.messages.len(), 2);
    }

    #[test]
    fn test_discard_and_unknown_id() {
        let mut queue = queue();
        let id = queue.rows()[0].id;

        let removed = queue.discard(id).unwrap();
        assert_eq!(removed.row_number, 4);
        assert!(queue.discard(id).is_err());
        assert!(queue.promote(id, CleanedRow::new()).is_err());
    }
}
