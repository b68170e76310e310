//! Spreadsheet workbooks (xlsx, xlsm, xlsb, xls, ods) via calamine

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::NaiveDate;
use tracing::{debug, info};

use super::Table;
use crate::config::SheetKeywords;
use crate::domain::result::{Error, Result};
use crate::domain::{CellValue, DocumentKind};

/// Pick the sheet holding `kind` documents
///
/// A sheet matches when its lower-cased name contains one of the kind's
/// keywords and none of the other kind's. Invoices fall back to the first
/// sheet that does not look like a notes sheet; notes have no fallback.
pub fn select_sheet<'a>(
    names: &'a [String],
    kind: DocumentKind,
    keywords: &SheetKeywords,
) -> Option<&'a String> {
    let wanted = keywords.for_kind(kind);
    let excluded = keywords.for_kind(kind.other());
    let mentions = |name: &str, list: &[String]| {
        let lower = name.to_lowercase();
        list.iter().any(|k| lower.contains(&k.to_lowercase()))
    };

    names
        .iter()
        .find(|name| mentions(name, wanted) && !mentions(name, excluded))
        .or_else(|| match kind {
            DocumentKind::B2b => names.iter().find(|name| !mentions(name, excluded)),
            DocumentKind::Cdnr => None,
        })
}

/// Read the sheet for `kind` from a workbook
///
/// Returns [`Error::MissingSheet`] when no sheet matches, which callers
/// treat as zero rows rather than a failure.
pub fn read_table(bytes: &[u8], kind: DocumentKind, keywords: &SheetKeywords) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| Error::corrupt(format!("cannot open workbook: {}", e)))?;

    let names = workbook.sheet_names();
    let Some(sheet) = select_sheet(&names, kind, keywords).cloned() else {
        info!(kind = %kind, sheets = names.len(), "No sheet matches document kind");
        return Err(Error::MissingSheet(format!(
            "no {} sheet among [{}]",
            kind,
            names.join(", ")
        )));
    };

    let values = workbook
        .worksheet_range(&sheet)
        .map_err(|e| Error::corrupt(format!("cannot read sheet {}: {}", sheet, e)))?;

    // Formulas are optional metadata; a reader that cannot supply them
    // still yields the cached values.
    let formulas = workbook.worksheet_formula(&sheet).ok();

    debug!(sheet = %sheet, rows = values.height(), "Reading worksheet");
    Ok(table_from_range(&values, formulas.as_ref()))
}

fn table_from_range(values: &Range<Data>, formulas: Option<&Range<String>>) -> Table {
    let Some((start_row, start_col)) = values.start() else {
        return Table::default();
    };

    let rows = values
        .rows()
        .enumerate()
        .map(|(r, row)| {
            let mut cells: Vec<CellValue> = (0..start_col).map(|_| CellValue::Empty).collect();
            cells.extend(row.iter().enumerate().map(|(c, data)| {
                let position = (start_row + r as u32, start_col + c as u32);
                let value = cell_from_data(data);
                match formulas.and_then(|f| f.get_value(position)) {
                    Some(formula) if !formula.is_empty() => CellValue::Formula {
                        formula: formula.clone(),
                        result: Box::new(value),
                    },
                    _ => value,
                }
            }));
            cells
        })
        .collect();

    Table {
        rows,
        first_row: start_row as usize,
    }
}

/// Map one calamine cell onto the pipeline's cell union
pub fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Serial day number; the normalizer converts it for date fields
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}
