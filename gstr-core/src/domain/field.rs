//! Canonical fields, per-kind header dictionaries, and the row shapes that
//! carry them between pipeline stages

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which document category a source feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Ordinary business-to-business invoices
    B2b,
    /// Credit/debit notes issued to registered recipients
    Cdnr,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::B2b => "b2b",
            Self::Cdnr => "cdnr",
        }
    }

    /// The other kind, used for sheet exclusion
    pub fn other(&self) -> Self {
        match self {
            Self::B2b => Self::Cdnr,
            Self::Cdnr => Self::B2b,
        }
    }

    /// Field holding the document number for this kind
    pub fn number_field(&self) -> Field {
        match self {
            Self::B2b => Field::InvoiceNumber,
            Self::Cdnr => Field::NoteNumber,
        }
    }

    pub fn date_field(&self) -> Field {
        match self {
            Self::B2b => Field::InvoiceDate,
            Self::Cdnr => Field::NoteDate,
        }
    }

    pub fn value_field(&self) -> Field {
        match self {
            Self::B2b => Field::InvoiceValue,
            Self::Cdnr => Field::NoteValue,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b2b" | "invoice" | "invoices" => Ok(Self::B2b),
            "cdnr" | "note" | "notes" => Ok(Self::Cdnr),
            other => Err(format!("unknown document kind '{}'", other)),
        }
    }
}

/// Canonical field names shared by every source layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Gstin,
    ReceiverName,
    InvoiceNumber,
    InvoiceDate,
    InvoiceValue,
    InvoiceType,
    PlaceOfSupply,
    ReverseCharge,
    NoteNumber,
    NoteDate,
    NoteValue,
    NoteType,
    HsnCode,
    Description,
    Quantity,
    Unit,
    Rate,
    IgstRate,
    CgstRate,
    TaxableValue,
    IgstAmount,
    CgstAmount,
    SgstAmount,
    CessAmount,
}

/// How a field's cell is coerced by the normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Identifier,
    Number,
    Date,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gstin => "gstin",
            Self::ReceiverName => "receiverName",
            Self::InvoiceNumber => "invoiceNumber",
            Self::InvoiceDate => "invoiceDate",
            Self::InvoiceValue => "invoiceValue",
            Self::InvoiceType => "invoiceType",
            Self::PlaceOfSupply => "placeOfSupply",
            Self::ReverseCharge => "reverseCharge",
            Self::NoteNumber => "noteNumber",
            Self::NoteDate => "noteDate",
            Self::NoteValue => "noteValue",
            Self::NoteType => "noteType",
            Self::HsnCode => "hsnCode",
            Self::Description => "description",
            Self::Quantity => "quantity",
            Self::Unit => "unit",
            Self::Rate => "rate",
            Self::IgstRate => "igstRate",
            Self::CgstRate => "cgstRate",
            Self::TaxableValue => "taxableValue",
            Self::IgstAmount => "igstAmount",
            Self::CgstAmount => "cgstAmount",
            Self::SgstAmount => "sgstAmount",
            Self::CessAmount => "cessAmount",
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Gstin => FieldType::Identifier,
            Self::InvoiceDate | Self::NoteDate => FieldType::Date,
            Self::InvoiceValue
            | Self::NoteValue
            | Self::Quantity
            | Self::Rate
            | Self::IgstRate
            | Self::CgstRate
            | Self::TaxableValue
            | Self::IgstAmount
            | Self::CgstAmount
            | Self::SgstAmount
            | Self::CessAmount => FieldType::Number,
            _ => FieldType::Text,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header spellings shared by both kinds
const COMMON_HEADERS: &[(&str, Field)] = &[
    ("gstin", Field::Gstin),
    ("gstin/uin", Field::Gstin),
    ("gstin/uin of recipient", Field::Gstin),
    ("gstin of recipient", Field::Gstin),
    ("customer gstin", Field::Gstin),
    ("buyer gstin", Field::Gstin),
    ("recipient gstin", Field::Gstin),
    ("ctin", Field::Gstin),
    ("receiver name", Field::ReceiverName),
    ("recipient name", Field::ReceiverName),
    ("customer name", Field::ReceiverName),
    ("party name", Field::ReceiverName),
    ("buyer name", Field::ReceiverName),
    ("place of supply", Field::PlaceOfSupply),
    ("pos", Field::PlaceOfSupply),
    ("state code", Field::PlaceOfSupply),
    ("reverse charge", Field::ReverseCharge),
    ("rcm", Field::ReverseCharge),
    ("rchrg", Field::ReverseCharge),
    ("invoice type", Field::InvoiceType),
    ("hsn", Field::HsnCode),
    ("hsn code", Field::HsnCode),
    ("hsn/sac", Field::HsnCode),
    ("hsn/sac code", Field::HsnCode),
    ("sac", Field::HsnCode),
    ("description", Field::Description),
    ("item description", Field::Description),
    ("product", Field::Description),
    ("item name", Field::Description),
    ("quantity", Field::Quantity),
    ("qty", Field::Quantity),
    ("unit", Field::Unit),
    ("uqc", Field::Unit),
    ("uom", Field::Unit),
    ("rate", Field::Rate),
    ("tax rate", Field::Rate),
    ("gst rate", Field::Rate),
    ("rate %", Field::Rate),
    ("gst %", Field::Rate),
    ("rt", Field::Rate),
    ("igst rate", Field::IgstRate),
    ("igst %", Field::IgstRate),
    ("cgst rate", Field::CgstRate),
    ("cgst %", Field::CgstRate),
    ("taxable value", Field::TaxableValue),
    ("taxable amount", Field::TaxableValue),
    ("taxable amt", Field::TaxableValue),
    ("txval", Field::TaxableValue),
    ("igst", Field::IgstAmount),
    ("igst amount", Field::IgstAmount),
    ("integrated tax", Field::IgstAmount),
    ("integrated tax amount", Field::IgstAmount),
    ("cgst", Field::CgstAmount),
    ("cgst amount", Field::CgstAmount),
    ("central tax", Field::CgstAmount),
    ("central tax amount", Field::CgstAmount),
    ("sgst", Field::SgstAmount),
    ("sgst amount", Field::SgstAmount),
    ("sgst/utgst", Field::SgstAmount),
    ("sgst/utgst amount", Field::SgstAmount),
    ("state/ut tax", Field::SgstAmount),
    ("state/ut tax amount", Field::SgstAmount),
    ("cess", Field::CessAmount),
    ("cess amount", Field::CessAmount),
];

const INVOICE_HEADERS: &[(&str, Field)] = &[
    ("invoice number", Field::InvoiceNumber),
    ("invoice no", Field::InvoiceNumber),
    ("inv no", Field::InvoiceNumber),
    ("bill no", Field::InvoiceNumber),
    ("inum", Field::InvoiceNumber),
    ("invoice date", Field::InvoiceDate),
    ("inv date", Field::InvoiceDate),
    ("bill date", Field::InvoiceDate),
    ("idt", Field::InvoiceDate),
    ("invoice value", Field::InvoiceValue),
    ("inv value", Field::InvoiceValue),
    ("invoice amount", Field::InvoiceValue),
    ("total invoice value", Field::InvoiceValue),
    ("bill amount", Field::InvoiceValue),
];

const NOTE_HEADERS: &[(&str, Field)] = &[
    ("note number", Field::NoteNumber),
    ("note no", Field::NoteNumber),
    ("note/refund voucher number", Field::NoteNumber),
    ("credit note number", Field::NoteNumber),
    ("debit note number", Field::NoteNumber),
    ("nt_num", Field::NoteNumber),
    ("note date", Field::NoteDate),
    ("note/refund voucher date", Field::NoteDate),
    ("nt_dt", Field::NoteDate),
    ("note value", Field::NoteValue),
    ("note/refund voucher value", Field::NoteValue),
    ("note amount", Field::NoteValue),
    ("note type", Field::NoteType),
    ("document type", Field::NoteType),
    ("ntty", Field::NoteType),
];

/// Normalize a header cell: lower-case, strip `* . ( )`, collapse whitespace
pub fn normalize_header(raw: &str) -> String {
    let stripped: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '*' | '.' | '(' | ')'))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized header spelling → canonical field, for one document kind
#[derive(Debug, Clone)]
pub struct FieldDictionary {
    kind: DocumentKind,
    entries: HashMap<String, Field>,
}

impl FieldDictionary {
    /// Built-in dictionary for a document kind
    pub fn for_kind(kind: DocumentKind) -> Self {
        let specific = match kind {
            DocumentKind::B2b => INVOICE_HEADERS,
            DocumentKind::Cdnr => NOTE_HEADERS,
        };
        let entries = COMMON_HEADERS
            .iter()
            .chain(specific.iter())
            .map(|(name, field)| (normalize_header(name), *field))
            .collect();
        Self { kind, entries }
    }

    /// Add extra spellings (already in any case; normalized here)
    pub fn with_aliases<'a>(mut self, aliases: impl IntoIterator<Item = (&'a str, Field)>) -> Self {
        for (name, field) in aliases {
            self.entries.insert(normalize_header(name), field);
        }
        self
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Look up an already-normalized header
    pub fn get(&self, normalized: &str) -> Option<Field> {
        self.entries.get(normalized).copied()
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.entries.contains_key(normalized)
    }
}

/// Column index → canonical field, built once per source document
pub type HeaderMap = BTreeMap<usize, Field>;

/// A coerced cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(#[serde(with = "crate::domain::amount")] Decimal),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

/// Canonical field → coerced value, produced by the normalizer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedRow {
    #[serde(flatten)]
    values: BTreeMap<Field, FieldValue>,
}

impl CleanedRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: FieldValue) {
        self.values.insert(field, value);
    }

    pub fn set_text(&mut self, field: Field, value: impl Into<String>) {
        self.set(field, FieldValue::Text(value.into()));
    }

    pub fn set_number(&mut self, field: Field, value: Decimal) {
        self.set(field, FieldValue::Number(value));
    }

    pub fn remove(&mut self, field: Field) -> Option<FieldValue> {
        self.values.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    /// Text value, empty strings treated as absent
    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field)
            .and_then(FieldValue::as_text)
            .filter(|s| !s.is_empty())
    }

    pub fn number(&self, field: Field) -> Option<Decimal> {
        self.get(field).and_then(FieldValue::as_decimal)
    }

    /// Numeric value, absent treated as zero
    pub fn number_or_zero(&self, field: Field) -> Decimal {
        self.number(field).unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Field, &FieldValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Invoice   No.* "), "invoice no");
        assert_eq!(normalize_header("Taxable Value (₹)"), "taxable value ₹");
        assert_eq!(normalize_header("GSTIN/UIN of Recipient"), "gstin/uin of recipient");
    }

    #[test]
    fn test_dictionary_per_kind() {
        let b2b = FieldDictionary::for_kind(DocumentKind::B2b);
        let cdnr = FieldDictionary::for_kind(DocumentKind::Cdnr);

        assert_eq!(b2b.get("invoice number"), Some(Field::InvoiceNumber));
        assert_eq!(b2b.get("note number"), None);
        assert_eq!(cdnr.get("note type"), Some(Field::NoteType));
        assert_eq!(cdnr.get("taxable value"), Some(Field::TaxableValue));
    }

    #[test]
    fn test_aliases() {
        let dict = FieldDictionary::for_kind(DocumentKind::B2b)
            .with_aliases([("Voucher No.", Field::InvoiceNumber)]);
        assert_eq!(dict.get("voucher no"), Some(Field::InvoiceNumber));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("B2B".parse::<DocumentKind>().unwrap(), DocumentKind::B2b);
        assert_eq!("notes".parse::<DocumentKind>().unwrap(), DocumentKind::Cdnr);
        assert!("export".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_cleaned_row_accessors() {
        let mut row = CleanedRow::new();
        row.set_text(Field::Gstin, "");
        row.set_number(Field::TaxableValue, Decimal::new(1000, 0));

        assert_eq!(row.text(Field::Gstin), None);
        assert_eq!(row.number_or_zero(Field::TaxableValue), Decimal::new(1000, 0));
        assert_eq!(row.number_or_zero(Field::CessAmount), Decimal::ZERO);
    }
}
