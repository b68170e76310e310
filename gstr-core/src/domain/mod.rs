//! Core domain entities
//!
//! Pure data structures and lookups - no I/O or external dependencies.

pub mod amount;
mod cell;
mod document;
mod field;
pub mod hsn;
mod hsn_data;
pub mod rate;
pub mod result;
pub mod return_doc;

pub use cell::{raw_row, CellValue, RawRow};
pub use document::{
    Document, DocumentHeader, DocumentKey, LineItem, NoteType, RowError, TaxTotals, ValidatedRow,
};
pub use field::{
    normalize_header, CleanedRow, DocumentKind, Field, FieldDictionary, FieldType, FieldValue,
    HeaderMap,
};
pub use hsn::{CodeHierarchy, CodeLevel, CodeMatch};
pub use return_doc::ReturnDocument;
