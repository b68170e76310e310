//! Comma-separated text sources

use csv::ReaderBuilder;

use super::Table;
use crate::domain::result::Result;
use crate::domain::CellValue;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse every record as a row of text cells
///
/// No row is treated as a header here; header detection happens later.
/// Quoted fields may contain commas and line breaks, and rows may differ
/// in length.
pub fn read_table(bytes: &[u8]) -> Result<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::text(field)
                    }
                })
                .collect(),
        );
    }

    Ok(Table { rows, first_row: 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_commas_stay_in_one_cell() {
        let table = read_table(b"name,value\n\"Acme, Inc\",\"1,180.00\"\n").unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][0], CellValue::text("Acme, Inc"));
        assert_eq!(table.rows[1][1], CellValue::text("1,180.00"));
    }

    #[test]
    fn test_ragged_rows_and_bom() {
        let table = read_table(b"\xEF\xBB\xBFReport\na,b,c\n1,,3\n").unwrap();
        assert_eq!(table.rows[0], vec![CellValue::text("Report")]);
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.rows[2][1], CellValue::Empty);
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        assert!(read_table(b"a,b\n\xff\xfe,1\n").is_err());
    }
}
