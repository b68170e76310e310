//! gstr core - GST invoice ingestion and return assembly
//!
//! This crate implements the pipeline following hexagonal architecture:
//!
//! - **domain**: Cells, canonical fields, documents, code hierarchy, return wire types
//! - **ports**: Trait definitions for external dependencies (SourceReader)
//! - **services**: Header detection, normalization, validation, grouping, assembly
//! - **adapters**: Concrete readers (local files, CSV, workbooks, return JSON)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;

use anyhow::Result;

use config::Config;
use services::{ImportService, ReturnAssembler};

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    CellValue, CleanedRow, CodeHierarchy, Document, DocumentKind, Field, LineItem, ReturnDocument,
    RowError,
};

/// Main context for gstr operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration and the services built from it.
pub struct GstrContext {
    pub config: Config,
    pub import_service: ImportService,
    pub assembler: ReturnAssembler,
}

impl GstrContext {
    /// Create a context from the settings in `gstr_dir`
    pub fn new(gstr_dir: &Path) -> Result<Self> {
        Ok(Self::from_config(Config::load(gstr_dir)?))
    }

    pub fn from_config(config: Config) -> Self {
        let import_service = ImportService::new(&config);
        let assembler = ReturnAssembler::new(config.pipeline.range_ordering);
        Self {
            config,
            import_service,
            assembler,
        }
    }

    /// Resolve a classification code against the built-in tables
    pub fn codes(&self) -> &'static CodeHierarchy {
        CodeHierarchy::builtin()
    }
}
