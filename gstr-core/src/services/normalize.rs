//! Row normalization - raw cells to cleaned, canonical field values
//!
//! Never fails: anything that cannot be coerced is either zeroed (numbers)
//! or passed through untouched (dates) for the validator to reject.

use chrono::{Days, NaiveDate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::config::AmbiguousDates;
use crate::domain::rate;
use crate::domain::{CellValue, CleanedRow, DocumentKind, Field, FieldType, HeaderMap, RawRow};

/// Spreadsheet serial day of 1970-01-01
const UNIX_EPOCH_SERIAL: i64 = 25569;
/// Largest serial spreadsheets accept (31-12-9999)
const MAX_SERIAL: f64 = 2_958_465.0;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Maps raw rows through a header map and cleans every recognized field
#[derive(Debug, Clone, Default)]
pub struct RowNormalizer {
    ambiguous_dates: AmbiguousDates,
}

impl RowNormalizer {
    pub fn new(ambiguous_dates: AmbiguousDates) -> Self {
        Self { ambiguous_dates }
    }

    /// Clean one row and fill in derivable fields
    pub fn normalize(&self, raw: &RawRow, header: &HeaderMap, kind: DocumentKind) -> CleanedRow {
        let mut row = CleanedRow::new();

        for (column, field) in header {
            let Some(cell) = raw.get(column) else { continue };
            if cell.is_blank() {
                continue;
            }
            self.clean_field(&mut row, *field, cell);
        }

        reconcile(&mut row, kind);
        row
    }

    fn clean_field(&self, row: &mut CleanedRow, field: Field, cell: &CellValue) {
        match field.field_type() {
            FieldType::Number => row.set_number(field, parse_number(cell)),
            FieldType::Date => row.set_text(field, normalize_date(cell, self.ambiguous_dates)),
            FieldType::Identifier => {
                let id: String = cell
                    .display_text()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                row.set_text(field, id.to_uppercase());
            }
            FieldType::Text => row.set_text(field, clean_text(field, cell)),
        }
    }
}

fn clean_text(field: Field, cell: &CellValue) -> String {
    let text = cell.display_text().trim().to_string();
    match field {
        Field::PlaceOfSupply => normalize_place_of_supply(&text),
        Field::ReverseCharge => normalize_flag(&text).to_string(),
        Field::NoteType => normalize_note_type(&text),
        Field::InvoiceType | Field::Unit => text.to_uppercase(),
        Field::HsnCode => normalize_hsn(cell, &text),
        _ => text,
    }
}

/// `"27-Maharashtra"` → `"27"`, `"7"` → `"07"`
fn normalize_place_of_supply(text: &str) -> String {
    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        0 => text.to_string(),
        1 => format!("0{}", digits),
        _ => digits,
    }
}

fn normalize_flag(text: &str) -> &'static str {
    match text.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => "Y",
        _ => "N",
    }
}

fn normalize_note_type(text: &str) -> String {
    let upper = text.to_uppercase();
    if upper.starts_with('C') {
        "C".to_string()
    } else if upper.starts_with('D') {
        "D".to_string()
    } else {
        upper
    }
}

/// Numeric cells lose leading zeros (`401` for `0401`); put them back
fn normalize_hsn(cell: &CellValue, text: &str) -> String {
    let code: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cell.as_number().is_some() && code.len() % 2 == 1 {
        format!("0{}", code)
    } else {
        code
    }
}

/// Coerce a cell to a decimal; anything unparseable is zero
pub fn parse_number(cell: &CellValue) -> Decimal {
    match cell.resolved() {
        CellValue::Number(n) => Decimal::from_f64(*n)
            .map(|d| d.round_dp(6).normalize())
            .unwrap_or(Decimal::ZERO),
        CellValue::Bool(_) | CellValue::Date(_) | CellValue::Empty | CellValue::Error(_) => {
            Decimal::ZERO
        }
        other => parse_number_text(&other.display_text()),
    }
}

/// Strip currency symbols, percent signs, grouping commas and whitespace
pub fn parse_number_text(text: &str) -> Decimal {
    let trimmed = text.trim();

    // (1,234.00) is an accounting negative
    let (negative, body) = match trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let lower = body.to_ascii_lowercase();
    let body = if lower.starts_with("rs.") || lower.starts_with("inr") {
        &body[3..]
    } else if lower.starts_with("rs") {
        &body[2..]
    } else {
        body
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '₹' | '$' | '€' | '£' | '%' | ',') && !c.is_whitespace())
        .collect();

    match cleaned.parse::<Decimal>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => Decimal::ZERO,
    }
}

/// Convert a spreadsheet serial day count to a date, using whole days only
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_SERIAL {
        return None;
    }
    let offset = serial.trunc() as i64 - UNIX_EPOCH_SERIAL;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    if offset >= 0 {
        epoch.checked_add_days(Days::new(offset as u64))
    } else {
        epoch.checked_sub_days(Days::new(offset.unsigned_abs()))
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Normalize a date cell to `DD-MM-YYYY`
pub fn normalize_date(cell: &CellValue, ambiguous: AmbiguousDates) -> String {
    match cell.resolved() {
        CellValue::Date(date) => format_date(*date),
        CellValue::Number(serial) => match serial_to_date(*serial) {
            Some(date) => format_date(date),
            None => cell.display_text(),
        },
        other => normalize_date_text(&other.display_text(), ambiguous),
    }
}

fn month_from_name(token: &str) -> Option<u32> {
    if token.len() < 3 || !token.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let prefix = token[..3].to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}

fn parse_token(token: &str) -> Option<u32> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

fn expand_year(token: &str) -> Option<i32> {
    let year = parse_token(token)? as i32;
    match token.len() {
        2 if year > 50 => Some(1900 + year),
        2 => Some(2000 + year),
        4 => Some(year),
        _ => None,
    }
}

/// Resolve the many ways people write dates into `DD-MM-YYYY`
///
/// Unresolvable input is returned unchanged.
pub fn normalize_date_text(input: &str, ambiguous: AmbiguousDates) -> String {
    let trimmed = input.trim();

    // Bare serial numbers exported as text
    if (5..=7).contains(&trimmed.len()) && trimmed.chars().all(|c| c.is_ascii_digit()) {
        if let Some(date) = trimmed.parse::<f64>().ok().and_then(serial_to_date) {
            return format_date(date);
        }
    }

    let date_part = strip_time(trimmed);
    let unified: String = date_part
        .chars()
        .map(|c| if matches!(c, ',' | '/' | '.') { '-' } else { c })
        .collect();
    let tokens: Vec<&str> = unified
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    let [first, second, third] = tokens.as_slice() else {
        return input.to_string();
    };

    let (first, second, third) = (*first, *second, *third);
    let resolved = if first.len() == 4 {
        // YYYY-MM-DD, month possibly by name
        let month = month_from_name(second).or_else(|| parse_token(second));
        match (parse_token(third), month, expand_year(first)) {
            (Some(d), Some(m), Some(y)) => Some((d, m, y)),
            _ => None,
        }
    } else if let Some(month) = month_from_name(first) {
        // Mon-DD-YYYY
        parse_token(second).zip(expand_year(third)).map(|(d, y)| (d, month, y))
    } else if let Some(month) = month_from_name(second) {
        // DD-Mon-YYYY
        parse_token(first).zip(expand_year(third)).map(|(d, y)| (d, month, y))
    } else {
        match (parse_token(first), parse_token(second), expand_year(third)) {
            (Some(a), Some(b), Some(y)) => {
                if a > 12 || ambiguous == AmbiguousDates::DayFirst {
                    Some((a, b, y))
                } else {
                    Some((b, a, y))
                }
            }
            _ => None,
        }
    };

    match resolved {
        Some((day, month, year)) => format!("{:02}-{:02}-{:04}", day, month, year),
        None => input.to_string(),
    }
}

/// Drop a trailing time component: `2024-01-15T10:00:00`, `15/01/2024 10:30`
fn strip_time(text: &str) -> &str {
    if let Some((date, _)) = text.split_once('T') {
        if date.len() == 10 && date.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            return date;
        }
    }
    match text.split_once(' ') {
        Some((date, rest)) if rest.contains(':') => date,
        _ => text,
    }
}

fn positive(row: &CleanedRow, field: Field) -> Option<Decimal> {
    row.number(field).filter(|v| *v > Decimal::ZERO)
}

/// Fill fields that can be derived from the others
fn reconcile(row: &mut CleanedRow, kind: DocumentKind) {
    // The two same-state halves of a split are always equal
    match (positive(row, Field::CgstAmount), positive(row, Field::SgstAmount)) {
        (Some(cgst), None) => row.set_number(Field::SgstAmount, cgst),
        (None, Some(sgst)) => row.set_number(Field::CgstAmount, sgst),
        _ => {}
    }

    if positive(row, Field::Rate).is_none() {
        if let Some(derived) = derive_rate(row) {
            row.set_number(Field::Rate, rate::snap_to_slab(derived));
        }
    }

    let value_field = kind.value_field();
    if positive(row, value_field).is_none() {
        let total = row.number_or_zero(Field::TaxableValue)
            + row.number_or_zero(Field::IgstAmount)
            + row.number_or_zero(Field::CgstAmount)
            + row.number_or_zero(Field::SgstAmount)
            + row.number_or_zero(Field::CessAmount);
        if total > Decimal::ZERO {
            row.set_number(value_field, total);
        }
    }
}

fn derive_rate(row: &CleanedRow) -> Option<Decimal> {
    if let Some(igst_rate) = positive(row, Field::IgstRate) {
        return Some(igst_rate);
    }
    if let Some(cgst_rate) = positive(row, Field::CgstRate) {
        return Some(cgst_rate * Decimal::TWO);
    }
    let taxable = positive(row, Field::TaxableValue)?;
    let tax = row.number_or_zero(Field::IgstAmount)
        + row.number_or_zero(Field::CgstAmount)
        + row.number_or_zero(Field::SgstAmount);
    Some(tax / taxable * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::raw_row;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn month_first(s: &str) -> String {
        normalize_date_text(s, AmbiguousDates::MonthFirst)
    }

    #[test]
    fn test_date_day_first_when_unambiguous() {
        assert_eq!(month_first("15/01/2024"), "15-01-2024");
        assert_eq!(month_first("15.01.2024"), "15-01-2024");
        assert_eq!(month_first("31-12-23"), "31-12-2023");
    }

    #[test]
    fn test_date_month_names() {
        assert_eq!(month_first("Nov-25-2025"), "25-11-2025");
        assert_eq!(month_first("15-Jan-2024"), "15-01-2024");
        assert_eq!(month_first("15 January, 2024"), "15-01-2024");
        assert_eq!(month_first("2024-Mar-05"), "05-03-2024");
    }

    #[test]
    fn test_date_iso_and_time_parts() {
        assert_eq!(month_first("2024-01-15"), "15-01-2024");
        assert_eq!(month_first("2024-01-15T10:00:00"), "15-01-2024");
        assert_eq!(month_first("2024/01/15 10:30"), "15-01-2024");
    }

    #[test]
    fn test_date_ambiguous_swaps_month_first() {
        assert_eq!(month_first("01/02/2024"), "02-01-2024");
        assert_eq!(
            normalize_date_text("01/02/2024", AmbiguousDates::DayFirst),
            "01-02-2024"
        );
    }

    #[test]
    fn test_date_two_digit_years() {
        assert_eq!(month_first("25-12-99"), "25-12-1999");
        assert_eq!(month_first("25-12-50"), "25-12-2050");
        assert_eq!(month_first("25-12-51"), "25-12-1951");
    }

    #[test]
    fn test_unparseable_date_passes_through() {
        assert_eq!(month_first("next tuesday"), "next tuesday");
        assert_eq!(month_first("15-01"), "15-01");
        assert_eq!(month_first("aa-bb-cccc"), "aa-bb-cccc");
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(serial_to_date(25569.0), NaiveDate::from_ymd_opt(1970, 1, 1));
        assert_eq!(serial_to_date(45678.0), NaiveDate::from_ymd_opt(2025, 1, 21));
        assert_eq!(serial_to_date(45678.75), NaiveDate::from_ymd_opt(2025, 1, 21));
        assert_eq!(serial_to_date(0.0), None);

        let cell = CellValue::Number(45678.0);
        assert_eq!(normalize_date(&cell, AmbiguousDates::MonthFirst), "21-01-2025");
        assert_eq!(month_first("45678"), "21-01-2025");
    }

    #[test]
    fn test_native_date_cell() {
        let cell = CellValue::Date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(normalize_date(&cell, AmbiguousDates::MonthFirst), "09-03-2024");
    }

    #[test]
    fn test_number_cleaning() {
        assert_eq!(parse_number_text("₹ 1,18,000.50"), d("118000.50"));
        assert_eq!(parse_number_text("18%"), d("18"));
        assert_eq!(parse_number_text("Rs. 500"), d("500"));
        assert_eq!(parse_number_text("INR 1,000"), d("1000"));
        assert_eq!(parse_number_text("(250.00)"), d("-250.00"));
        assert_eq!(parse_number_text("n/a"), Decimal::ZERO);
        assert_eq!(parse_number(&CellValue::Number(0.1 + 0.2)), d("0.3"));
        assert_eq!(parse_number(&CellValue::Bool(true)), Decimal::ZERO);
    }

    fn header(fields: &[Field]) -> HeaderMap {
        fields.iter().copied().enumerate().collect()
    }

    #[test]
    fn test_derives_rate_from_half_tax() {
        let header = header(&[Field::TaxableValue, Field::CgstAmount]);
        let raw = raw_row(vec![CellValue::text("10000"), CellValue::text("900")]);

        let row = RowNormalizer::default().normalize(&raw, &header, DocumentKind::B2b);
        assert_eq!(row.number(Field::SgstAmount), Some(d("900")));
        assert_eq!(row.number(Field::Rate), Some(d("18")));
        assert_eq!(row.number(Field::InvoiceValue), Some(d("11800")));
    }

    #[test]
    fn test_rate_prefers_igst_rate_then_cgst_rate() {
        let header = header(&[Field::TaxableValue, Field::IgstRate, Field::CgstRate]);

        let raw = raw_row(vec![CellValue::text("100"), CellValue::text("12"), CellValue::text("9")]);
        let row = RowNormalizer::default().normalize(&raw, &header, DocumentKind::B2b);
        assert_eq!(row.number(Field::Rate), Some(d("12")));

        let raw = raw_row(vec![CellValue::text("100"), CellValue::text("0"), CellValue::text("2.5")]);
        let row = RowNormalizer::default().normalize(&raw, &header, DocumentKind::B2b);
        assert_eq!(row.number(Field::Rate), Some(d("5")));
    }

    #[test]
    fn test_computed_rate_snaps_to_slab() {
        let header = header(&[Field::TaxableValue, Field::IgstAmount, Field::Rate]);
        let raw = raw_row(vec![CellValue::text("999"), CellValue::text("180"), CellValue::text("0")]);
        let row = RowNormalizer::default().normalize(&raw, &header, DocumentKind::B2b);
        assert_eq!(row.number(Field::Rate), Some(d("18")));
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let header = header(&[
            Field::TaxableValue,
            Field::IgstAmount,
            Field::Rate,
            Field::NoteValue,
        ]);
        let raw = raw_row(vec![
            CellValue::text("1000"),
            CellValue::text("120"),
            CellValue::text("12"),
            CellValue::text("1200"),
        ]);
        let row = RowNormalizer::default().normalize(&raw, &header, DocumentKind::Cdnr);
        assert_eq!(row.number(Field::Rate), Some(d("12")));
        assert_eq!(row.number(Field::NoteValue), Some(d("1200")));
        assert!(!row.contains(Field::InvoiceValue));
    }

    #[test]
    fn test_text_fields() {
        let header = header(&[
            Field::Gstin,
            Field::PlaceOfSupply,
            Field::ReverseCharge,
            Field::NoteType,
            Field::HsnCode,
            Field::Description,
        ]);
        let raw = raw_row(vec![
            CellValue::text(" 27aapfu0939f1zv "),
            CellValue::text("7-Delhi"),
            CellValue::text("Yes"),
            CellValue::text("Credit Note"),
            CellValue::Number(4011000.0),
            CellValue::text("  Skimmed milk  "),
        ]);
        let row = RowNormalizer::default().normalize(&raw, &header, DocumentKind::Cdnr);

        assert_eq!(row.text(Field::Gstin), Some("27AAPFU0939F1ZV"));
        assert_eq!(row.text(Field::PlaceOfSupply), Some("07"));
        assert_eq!(row.text(Field::ReverseCharge), Some("Y"));
        assert_eq!(row.text(Field::NoteType), Some("C"));
        assert_eq!(row.text(Field::HsnCode), Some("04011000"));
        assert_eq!(row.text(Field::Description), Some("Skimmed milk"));
    }

    #[test]
    fn test_unmapped_and_blank_cells_are_absent() {
        let header: HeaderMap = [(0, Field::Gstin)].into_iter().collect();
        let raw = raw_row(vec![CellValue::text("  "), CellValue::text("ignored")]);
        let row = RowNormalizer::default().normalize(&raw, &header, DocumentKind::B2b);
        assert!(row.is_empty());
    }
}
