//! Import service - batch ingestion of source documents
//!
//! Files are processed strictly one after another. Each file is read with
//! one await; header detection, normalization, validation and grouping
//! then run synchronously. The duplicate tracker is the only state that
//! crosses file boundaries.

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dedup::DuplicateTracker;
use super::group::{duplicate_message, DocumentGrouper, Fold};
use super::header::HeaderResolver;
use super::normalize::RowNormalizer;
use super::remediation::{Promotion, RemediationQueue};
use super::validate::RowValidator;
use crate::adapters::{delimited, return_json, workbook, SourceFormat, Table};
use crate::config::{Config, DuplicateScope, PipelineSettings, SheetKeywords};
use crate::domain::result::{Error, Result};
use crate::domain::{
    raw_row, CellValue, CleanedRow, Document, DocumentKind, FieldDictionary, RowError,
};
use crate::ports::{SourceBytes, SourceReader};

/// Counters over a whole batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub files_processed: usize,
    pub files_failed: usize,
    /// Non-blank data rows seen
    pub total_rows: usize,
    pub valid_rows: usize,
    /// Rejected rows, duplicates included
    pub error_rows: usize,
    pub duplicate_rows: usize,
    pub documents: usize,
    pub low_confidence_headers: usize,
}

/// What happened to one file of a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub name: String,
    pub rows: usize,
    /// 1-based source row used as the header, for tabular sources
    pub header_row: Option<usize>,
    pub low_confidence: bool,
    /// Set when the file could not be read at all
    pub error: Option<String>,
}

impl FileOutcome {
    fn failed(name: &str, error: &Error) -> Self {
        Self {
            name: name.to_string(),
            rows: 0,
            header_row: None,
            low_confidence: false,
            error: Some(error.to_string()),
        }
    }
}

/// Output of one batch: documents, rejected rows and counters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub kind: DocumentKind,
    pub documents: Vec<Document>,
    pub rejected: RemediationQueue,
    pub summary: ImportSummary,
    pub files: Vec<FileOutcome>,
}

impl ImportOutcome {
    fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            documents: Vec::new(),
            rejected: RemediationQueue::default(),
            summary: ImportSummary::default(),
            files: Vec::new(),
        }
    }

    /// Re-validate an edited rejected row and add it as a new document
    ///
    /// A duplicate row stops counting as a duplicate once it has been
    /// edited, whether or not the edit passes.
    pub fn promote(&mut self, id: Uuid, edited: CleanedRow) -> Result<Promotion> {
        let was_duplicate = self.rejected.get(id).is_some_and(|row| row.error.duplicate);
        let promotion = self.rejected.promote(id, edited)?;
        if was_duplicate {
            self.summary.duplicate_rows = self.summary.duplicate_rows.saturating_sub(1);
        }
        if let Promotion::Promoted { document, .. } = &promotion {
            self.documents.push(document.clone());
            self.summary.documents += 1;
            self.summary.valid_rows += 1;
            self.summary.error_rows = self.summary.error_rows.saturating_sub(1);
        }
        Ok(promotion)
    }

    /// Drop a rejected row; it no longer counts toward the totals
    pub fn discard(&mut self, id: Uuid) -> Result<RowError> {
        let removed = self.rejected.discard(id)?;
        self.summary.error_rows = self.summary.error_rows.saturating_sub(1);
        self.summary.total_rows = self.summary.total_rows.saturating_sub(1);
        if removed.duplicate {
            self.summary.duplicate_rows = self.summary.duplicate_rows.saturating_sub(1);
        }
        Ok(removed)
    }

    fn absorb(&mut self, file: FileResult) {
        self.summary.files_processed += 1;
        self.summary.total_rows += file.total_rows;
        self.summary.valid_rows += file.valid_rows;
        self.summary.error_rows += file.errors.len();
        self.summary.duplicate_rows += file.duplicate_rows;
        self.summary.documents += file.documents.len();
        if file.outcome.low_confidence {
            self.summary.low_confidence_headers += 1;
        }
        self.documents.extend(file.documents);
        self.rejected.extend(file.errors);
        self.files.push(file.outcome);
    }
}

/// Result of running one file through the pipeline
#[derive(Debug)]
struct FileResult {
    documents: Vec<Document>,
    errors: Vec<RowError>,
    total_rows: usize,
    valid_rows: usize,
    duplicate_rows: usize,
    outcome: FileOutcome,
}

impl FileResult {
    fn empty(name: &str) -> Self {
        Self {
            documents: Vec::new(),
            errors: Vec::new(),
            total_rows: 0,
            valid_rows: 0,
            duplicate_rows: 0,
            outcome: FileOutcome {
                name: name.to_string(),
                rows: 0,
                header_row: None,
                low_confidence: false,
                error: None,
            },
        }
    }
}

/// Import service for tabular and return-document sources
pub struct ImportService {
    pipeline: PipelineSettings,
    sheet_keywords: SheetKeywords,
}

impl ImportService {
    pub fn new(config: &Config) -> Self {
        Self {
            pipeline: config.pipeline.clone(),
            sheet_keywords: config.sheet_keywords.clone(),
        }
    }

    /// Process a batch with a fresh duplicate tracker
    pub async fn process_batch<S: SourceReader>(
        &self,
        sources: &[S],
        kind: DocumentKind,
    ) -> ImportOutcome {
        let mut tracker = DuplicateTracker::new();
        self.process_batch_with(sources, kind, &mut tracker).await
    }

    /// Process a batch against a caller-owned duplicate tracker
    ///
    /// A file that cannot be read or decoded is recorded as failed and the
    /// batch moves on. With file scope each file gets its own tracker and
    /// the caller's tracker is left untouched.
    pub async fn process_batch_with<S: SourceReader>(
        &self,
        sources: &[S],
        kind: DocumentKind,
        tracker: &mut DuplicateTracker,
    ) -> ImportOutcome {
        let mut outcome = ImportOutcome::new(kind);

        for source in sources {
            let mut file_tracker = DuplicateTracker::new();
            let active = match self.pipeline.duplicate_scope {
                DuplicateScope::Batch => &mut *tracker,
                DuplicateScope::File => &mut file_tracker,
            };

            let result = source
                .read()
                .await
                .and_then(|document| self.process_document(&document, kind, active));

            match result {
                Ok(file) => {
                    info!(
                        file = %file.outcome.name,
                        kind = %kind,
                        rows = file.total_rows,
                        valid = file.valid_rows,
                        rejected = file.errors.len(),
                        documents = file.documents.len(),
                        "File processed"
                    );
                    outcome.absorb(file);
                }
                Err(e) => {
                    warn!(file = %source.name(), error = %e, "File rejected");
                    outcome.summary.files_failed += 1;
                    outcome.files.push(FileOutcome::failed(source.name(), &e));
                }
            }
        }

        outcome
    }

    /// Run one document already in memory through the pipeline
    fn process_document(
        &self,
        document: &SourceBytes,
        kind: DocumentKind,
        tracker: &mut DuplicateTracker,
    ) -> Result<FileResult> {
        let table = match SourceFormat::detect(document)? {
            SourceFormat::Delimited => delimited::read_table(&document.bytes)?,
            SourceFormat::Workbook => {
                match workbook::read_table(&document.bytes, kind, &self.sheet_keywords) {
                    Ok(table) => table,
                    Err(e) if e.is_missing_sheet() => {
                        info!(file = %document.name, kind = %kind, "No matching sheet; zero rows");
                        return Ok(FileResult::empty(&document.name));
                    }
                    Err(e) => return Err(e),
                }
            }
            SourceFormat::ReturnJson => {
                let documents = return_json::read_documents(&document.bytes, kind)?;
                return Ok(Self::trusted_documents(&document.name, documents));
            }
        };

        Ok(self.process_table(&document.name, &table, kind, tracker))
    }

    /// Documents from a return file skip validation and duplicate checks
    fn trusted_documents(name: &str, documents: Vec<Document>) -> FileResult {
        let lines = documents.iter().map(|d| d.lines.len()).sum();
        let mut file = FileResult::empty(name);
        file.total_rows = lines;
        file.valid_rows = lines;
        file.outcome.rows = lines;
        file.documents = documents;
        file
    }

    fn process_table(
        &self,
        name: &str,
        table: &Table,
        kind: DocumentKind,
        tracker: &mut DuplicateTracker,
    ) -> FileResult {
        let mut file = FileResult::empty(name);
        if table.rows.is_empty() {
            return file;
        }

        let dictionary = FieldDictionary::for_kind(kind);
        let resolver =
            HeaderResolver::new(self.pipeline.header_scan_rows, self.pipeline.min_header_matches);
        let detection = resolver.detect(&table.rows, &dictionary);
        file.outcome.header_row = Some(table.first_row + detection.row_index + 1);
        file.outcome.low_confidence = detection.low_confidence;

        // A table without a number column holds no documents of this kind
        let number_field = kind.number_field();
        if !detection.header_map.values().any(|field| *field == number_field) {
            info!(file = %name, kind = %kind, "No {} column; zero rows", number_field);
            return file;
        }

        let normalizer = RowNormalizer::new(self.pipeline.ambiguous_dates);
        let validator = RowValidator::new(kind);
        let mut grouper = DocumentGrouper::new(self.pipeline.declared_value);

        for (index, cells) in table.rows.iter().enumerate().skip(detection.row_index + 1) {
            if cells.iter().all(CellValue::is_blank) {
                continue;
            }
            file.total_rows += 1;

            let row_number = table.first_row + index + 1;
            let raw = raw_row(cells.iter().cloned());
            let cleaned = normalizer.normalize(&raw, &detection.header_map, kind);

            let (messages, duplicate) = match validator.validate(&cleaned) {
                Ok(valid) => {
                    let number = valid.header.number.clone();
                    match grouper.fold(valid, tracker) {
                        Fold::Opened | Fold::Appended => {
                            file.valid_rows += 1;
                            continue;
                        }
                        Fold::Duplicate => {
                            file.duplicate_rows += 1;
                            (vec![duplicate_message(kind, &number)], true)
                        }
                    }
                }
                Err(messages) => (messages, false),
            };

            debug!(row_number, errors = messages.len(), duplicate, "Row rejected");
            file.errors.push(RowError {
                row_number,
                source: name.to_string(),
                kind,
                raw_data: cleaned,
                messages,
                duplicate,
            });
        }

        file.outcome.rows = file.total_rows;
        file.documents = grouper.into_documents();
        file
    }
}
