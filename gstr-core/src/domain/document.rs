//! Line items and aggregate tax documents

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::field::{CleanedRow, DocumentKind};

/// Credit or debit note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteType {
    #[serde(rename = "C")]
    Credit,
    #[serde(rename = "D")]
    Debit,
}

impl NoteType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Credit => "C",
            Self::Debit => "D",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "C" => Some(Self::Credit),
            "D" => Some(Self::Debit),
            _ => None,
        }
    }
}

/// One classified good or service entry of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub hsn_code: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub rate: Decimal,
    pub taxable_value: Decimal,
    pub igst_amount: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub cess_amount: Decimal,
}

impl LineItem {
    /// Line with a rate and taxable value and no tax yet
    pub fn new(rate: Decimal, taxable_value: Decimal) -> Self {
        Self {
            hsn_code: None,
            description: None,
            quantity: None,
            unit: None,
            rate,
            taxable_value,
            igst_amount: Decimal::ZERO,
            cgst_amount: Decimal::ZERO,
            sgst_amount: Decimal::ZERO,
            cess_amount: Decimal::ZERO,
        }
    }

    /// Tax across all categories, levy included
    pub fn total_tax(&self) -> Decimal {
        self.igst_amount + self.cgst_amount + self.sgst_amount + self.cess_amount
    }

    /// Taxable value plus every tax amount
    pub fn line_total(&self) -> Decimal {
        self.taxable_value + self.total_tax()
    }
}

/// Running totals kept alongside a document's lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxTotals {
    pub taxable_value: Decimal,
    pub igst_amount: Decimal,
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub cess_amount: Decimal,
    pub total_tax: Decimal,
}

impl TaxTotals {
    pub fn add(&mut self, line: &LineItem) {
        self.taxable_value += line.taxable_value;
        self.igst_amount += line.igst_amount;
        self.cgst_amount += line.cgst_amount;
        self.sgst_amount += line.sgst_amount;
        self.cess_amount += line.cess_amount;
        self.total_tax += line.total_tax();
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a LineItem>) -> Self {
        let mut totals = Self::default();
        for line in lines {
            totals.add(line);
        }
        totals
    }
}

/// Document-level fields of a validated row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHeader {
    pub kind: DocumentKind,
    pub counterparty_gstin: String,
    pub receiver_name: Option<String>,
    pub number: String,
    /// `DD-MM-YYYY`
    pub date: String,
    pub value: Decimal,
    pub place_of_supply: String,
    pub reverse_charge: bool,
    /// Invoice type code, `R` for regular
    pub invoice_type: String,
    pub note_type: Option<NoteType>,
}

/// A fully typed row that passed validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedRow {
    pub header: DocumentHeader,
    pub line: LineItem,
}

/// Natural key of an aggregate: counterparty plus document number
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentKey {
    pub counterparty_gstin: String,
    pub number: String,
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.counterparty_gstin, self.number)
    }
}

/// An invoice or note folded from one or more line rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(flatten)]
    pub header: DocumentHeader,
    pub lines: Vec<LineItem>,
    pub totals: TaxTotals,
}

impl Document {
    /// Open a document from its first row; totals seed from that line
    pub fn from_row(row: ValidatedRow) -> Self {
        let totals = TaxTotals::from_lines([&row.line]);
        Self {
            header: row.header,
            lines: vec![row.line],
            totals,
        }
    }

    /// Assemble from trusted lines, totals recomputed
    pub fn from_parts(header: DocumentHeader, lines: Vec<LineItem>) -> Self {
        let totals = TaxTotals::from_lines(&lines);
        Self { header, lines, totals }
    }

    pub fn key(&self) -> DocumentKey {
        DocumentKey {
            counterparty_gstin: self.header.counterparty_gstin.clone(),
            number: self.header.number.clone(),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.header.kind
    }

    /// Append a line, keeping totals equal to the sum of lines
    pub fn push_line(&mut self, line: LineItem) {
        self.totals.add(&line);
        self.lines.push(line);
    }

    /// Sum of every line's taxable value and tax
    pub fn lines_total(&self) -> Decimal {
        self.totals.taxable_value + self.totals.total_tax
    }
}

/// A rejected row with one `<field> - <reason>` message per violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// 1-based row number in the source, header row included
    pub row_number: usize,
    /// Source file the row came from
    pub source: String,
    pub kind: DocumentKind,
    /// The cleaned data, which is what a user edits during remediation
    pub raw_data: CleanedRow,
    pub messages: Vec<String>,
    #[serde(default)]
    pub duplicate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(taxable: i64, igst: i64) -> LineItem {
        let mut l = LineItem::new(Decimal::new(18, 0), Decimal::new(taxable, 0));
        l.igst_amount = Decimal::new(igst, 0);
        l
    }

    fn header() -> DocumentHeader {
        DocumentHeader {
            kind: DocumentKind::B2b,
            counterparty_gstin: "27AAPFU0939F1ZV".to_string(),
            receiver_name: None,
            number: "INV-1".to_string(),
            date: "15-01-2024".to_string(),
            value: Decimal::new(1180, 0),
            place_of_supply: "27".to_string(),
            reverse_charge: false,
            invoice_type: "R".to_string(),
            note_type: None,
        }
    }

    #[test]
    fn test_totals_track_lines() {
        let mut doc = Document::from_row(ValidatedRow { header: header(), line: line(1000, 180) });
        doc.push_line(line(500, 90));

        assert_eq!(doc.lines.len(), 2);
        assert_eq!(doc.totals, TaxTotals::from_lines(&doc.lines));
        assert_eq!(doc.totals.taxable_value, Decimal::new(1500, 0));
        assert_eq!(doc.totals.total_tax, Decimal::new(270, 0));
        assert_eq!(doc.lines_total(), Decimal::new(1770, 0));
    }

    #[test]
    fn test_note_type_codes() {
        assert_eq!(NoteType::from_code("C"), Some(NoteType::Credit));
        assert_eq!(NoteType::Debit.code(), "D");
        assert_eq!(serde_json::to_string(&NoteType::Credit).unwrap(), "\"C\"");
    }

    #[test]
    fn test_line_total_includes_cess() {
        let mut l = line(1000, 180);
        l.cess_amount = Decimal::new(10, 0);
        assert_eq!(l.line_total(), Decimal::new(1190, 0));
    }
}
