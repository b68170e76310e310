//! Result and error types for the core library
//!
//! Only file-level failures are errors. Row-level problems travel as
//! [`RowError`](crate::domain::RowError) values next to the valid rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("Corrupt file: {0}")]
    CorruptFile(String),

    #[error("No matching sheet: {0}")]
    MissingSheet(String),

    #[error("Invalid export input: {0}")]
    InvalidExport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an unsupported file error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFile(msg.into())
    }

    /// Create a corrupt file error
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptFile(msg.into())
    }

    /// Create an invalid export input error
    pub fn invalid_export(msg: impl Into<String>) -> Self {
        Self::InvalidExport(msg.into())
    }

    /// Missing optional sheets are treated as zero rows, never as failures
    pub fn is_missing_sheet(&self) -> bool {
        matches!(self, Self::MissingSheet(_))
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Operation result with optional context (per-file outcomes, FFI callers)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Attach a context entry
    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<i32> = OperationResult::ok(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_from_result() {
        let err: Result<i32> = Err(Error::corrupt("truncated zip"));
        let result: OperationResult<i32> = err.into();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("Corrupt file"));
    }

    #[test]
    fn test_context() {
        let result: OperationResult<()> =
            OperationResult::fail("bad").with_context("file", serde_json::json!("a.csv"));
        assert_eq!(result.context.unwrap()["file"], "a.csv");
    }

    #[test]
    fn test_missing_sheet_flag() {
        assert!(Error::MissingSheet("cdnr".into()).is_missing_sheet());
        assert!(!Error::unsupported("x.pdf").is_missing_sheet());
    }
}
