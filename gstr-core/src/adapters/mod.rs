//! Adapter implementations
//!
//! Adapters implement the port traits and decode source documents:
//! - Local files and in-memory buffers for the SourceReader port
//! - Comma-separated text via the csv crate
//! - Spreadsheet workbooks via calamine
//! - Previously exported return documents via serde_json

pub mod delimited;
pub mod return_json;
pub mod source;
pub mod workbook;

pub use source::{FileSource, MemorySource};

use crate::domain::result::{Error, Result};
use crate::domain::CellValue;
use crate::ports::SourceBytes;

/// Rows of one sheet or text file, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<CellValue>>,
    /// 0-based source row of `rows[0]`
    pub first_row: usize,
}

/// How a source document is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited,
    Workbook,
    ReturnJson,
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0";

impl SourceFormat {
    /// Detect from the extension, falling back to the leading bytes
    pub fn detect(source: &SourceBytes) -> Result<Self> {
        match source.extension().as_deref() {
            Some("csv" | "txt") => return Ok(Self::Delimited),
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => return Ok(Self::Workbook),
            Some("json") => return Ok(Self::ReturnJson),
            _ => {}
        }

        let bytes = source.bytes.as_slice();
        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            return Ok(Self::Workbook);
        }
        if bytes.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{') {
            return Ok(Self::ReturnJson);
        }

        Err(Error::unsupported(format!(
            "{} (expected .csv, .xlsx, .xls, .ods or .json)",
            source.name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension_then_magic() {
        let detect = |name: &str, bytes: &[u8]| SourceFormat::detect(&SourceBytes::new(name, bytes));

        assert_eq!(detect("Sales.CSV", b"").unwrap(), SourceFormat::Delimited);
        assert_eq!(detect("r.xlsx", b"").unwrap(), SourceFormat::Workbook);
        assert_eq!(detect("upload", b"PK\x03\x04rest").unwrap(), SourceFormat::Workbook);
        assert_eq!(detect("upload", b"  {\"gstin\":1}").unwrap(), SourceFormat::ReturnJson);
        assert!(matches!(detect("scan.pdf", b"%PDF-1.7"), Err(Error::UnsupportedFile(_))));
    }
}
