//! Row validation - cleaned rows to typed records or field-level messages
//!
//! Every violated field yields one `<field> - <reason>` message; all
//! violations are reported, not just the first.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::rate;
use crate::domain::{
    CleanedRow, DocumentHeader, DocumentKind, Field, LineItem, NoteType, ValidatedRow,
};

static GSTIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").expect("valid GSTIN pattern")
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("valid date pattern"));

static STATE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}$").expect("valid state code pattern"));

/// Longest document number the portal accepts
pub const MAX_DOCUMENT_NUMBER_LEN: usize = 16;

/// True for a well-formed GSTIN
pub fn is_valid_gstin(gstin: &str) -> bool {
    GSTIN_RE.is_match(gstin)
}

/// True for a real calendar date written `DD-MM-YYYY`
pub fn is_valid_date(date: &str) -> bool {
    DATE_RE.is_match(date) && NaiveDate::parse_from_str(date, "%d-%m-%Y").is_ok()
}

/// Applies the fixed row schema for a document kind
#[derive(Debug, Clone, Copy)]
pub struct RowValidator {
    kind: DocumentKind,
}

struct Messages(Vec<String>);

impl Messages {
    fn push(&mut self, field: Field, reason: impl AsRef<str>) {
        self.0.push(format!("{} - {}", field, reason.as_ref()));
    }
}

impl RowValidator {
    pub fn new(kind: DocumentKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Validate a cleaned row; the row itself is never modified
    pub fn validate(&self, row: &CleanedRow) -> Result<ValidatedRow, Vec<String>> {
        let mut errors = Messages(Vec::new());

        let gstin = row.text(Field::Gstin).unwrap_or_default();
        if gstin.is_empty() {
            errors.push(Field::Gstin, "is required");
        } else if !is_valid_gstin(gstin) {
            errors.push(Field::Gstin, "must be a valid 15-character GSTIN");
        }

        let number_field = self.kind.number_field();
        let number = row.text(number_field).map(str::trim).unwrap_or_default();
        if number.is_empty() {
            errors.push(number_field, "is required");
        } else if number.chars().count() > MAX_DOCUMENT_NUMBER_LEN {
            errors.push(
                number_field,
                format!("must be at most {} characters", MAX_DOCUMENT_NUMBER_LEN),
            );
        }

        let date_field = self.kind.date_field();
        let date = row.text(date_field).unwrap_or_default();
        if !is_valid_date(date) {
            errors.push(date_field, "must be a valid date in DD-MM-YYYY format");
        }

        let value_field = self.kind.value_field();
        let value = row.number_or_zero(value_field);
        if value <= Decimal::ZERO {
            errors.push(value_field, "must be greater than zero");
        }

        let taxable_value = row.number_or_zero(Field::TaxableValue);
        if taxable_value <= Decimal::ZERO {
            errors.push(Field::TaxableValue, "must be greater than zero");
        }

        let place_of_supply = row.text(Field::PlaceOfSupply).unwrap_or_default();
        if !STATE_CODE_RE.is_match(place_of_supply) {
            errors.push(Field::PlaceOfSupply, "must be a 2-digit state code");
        }

        let rate = row.number(Field::Rate);
        match rate {
            None => errors.push(Field::Rate, "is required"),
            Some(r) if !rate::is_slab(r) => {
                errors.push(Field::Rate, format!("{} is not a permitted tax slab", r.normalize()))
            }
            _ => {}
        }

        if let Some(r) = row.number(Field::IgstRate).filter(|r| !r.is_zero()) {
            if !rate::is_slab(r) {
                errors.push(Field::IgstRate, format!("{} is not a permitted tax slab", r.normalize()));
            }
        }
        if let Some(r) = row.number(Field::CgstRate).filter(|r| !r.is_zero()) {
            if !rate::is_half_slab(r) {
                errors.push(
                    Field::CgstRate,
                    format!("{} is not half of a permitted tax slab", r.normalize()),
                );
            }
        }

        let mut amounts = [Decimal::ZERO; 4];
        for (slot, field) in [
            Field::IgstAmount,
            Field::CgstAmount,
            Field::SgstAmount,
            Field::CessAmount,
        ]
        .into_iter()
        .enumerate()
        {
            let amount = row.number_or_zero(field);
            if amount < Decimal::ZERO {
                errors.push(field, "must not be negative");
            }
            amounts[slot] = amount;
        }

        let quantity = row.number(Field::Quantity);
        if quantity.is_some_and(|q| q < Decimal::ZERO) {
            errors.push(Field::Quantity, "must not be negative");
        }

        let note_type = match self.kind {
            DocumentKind::B2b => None,
            DocumentKind::Cdnr => {
                let parsed = row.text(Field::NoteType).and_then(NoteType::from_code);
                if parsed.is_none() {
                    errors.push(Field::NoteType, "must be C (credit) or D (debit)");
                }
                parsed
            }
        };

        if !errors.0.is_empty() {
            return Err(errors.0);
        }

        let [igst_amount, cgst_amount, sgst_amount, cess_amount] = amounts;

        Ok(ValidatedRow {
            header: DocumentHeader {
                kind: self.kind,
                counterparty_gstin: gstin.to_string(),
                receiver_name: row.text(Field::ReceiverName).map(str::to_string),
                number: number.to_string(),
                date: date.to_string(),
                value,
                place_of_supply: place_of_supply.to_string(),
                reverse_charge: row.text(Field::ReverseCharge) == Some("Y"),
                invoice_type: row.text(Field::InvoiceType).unwrap_or("R").to_string(),
                note_type,
            },
            line: LineItem {
                hsn_code: row.text(Field::HsnCode).map(str::to_string),
                description: row.text(Field::Description).map(str::to_string),
                quantity,
                unit: row.text(Field::Unit).map(str::to_string),
                rate: rate.unwrap_or_default(),
                taxable_value,
                igst_amount,
                cgst_amount,
                sgst_amount,
                cess_amount,
            },
        })
    }
}
