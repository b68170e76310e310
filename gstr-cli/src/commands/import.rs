//! Import command - run source files through the pipeline

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use gstr_core::adapters::FileSource;
use gstr_core::{DocumentKind, OperationResult};

use super::{get_context, report_problems, resolve_files};
use crate::output;

pub async fn run(files: Vec<PathBuf>, kind: DocumentKind, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let files = resolve_files(files)?;
    let sources: Vec<FileSource> = files.into_iter().map(FileSource::new).collect();

    let outcome = ctx.import_service.process_batch(&sources, kind).await;

    if json {
        let result = OperationResult::ok(&outcome)
            .with_context("kind", serde_json::json!(kind.as_str()));
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let summary = &outcome.summary;
    println!("{}", format!("{} import", kind.as_str().to_uppercase()).bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Files processed", &summary.files_processed.to_string()]);
    table.add_row(vec!["Files failed", &summary.files_failed.to_string()]);
    table.add_row(vec!["Rows", &summary.total_rows.to_string()]);
    table.add_row(vec!["Valid rows", &summary.valid_rows.to_string()]);
    table.add_row(vec!["Rejected rows", &summary.error_rows.to_string()]);
    table.add_row(vec!["Duplicates", &summary.duplicate_rows.to_string()]);
    table.add_row(vec!["Documents", &summary.documents.to_string()]);
    println!("{}", table);

    for file in outcome.files.iter().filter(|f| f.low_confidence) {
        output::warning(&format!(
            "{}: header row not recognized, used row 1",
            file.name
        ));
    }

    if !outcome.documents.is_empty() {
        println!();
        let mut docs = output::create_table();
        docs.set_header(vec!["Counterparty", "Number", "Date", "Lines", "Taxable", "Tax", "Value"]);
        for doc in &outcome.documents {
            docs.add_row(vec![
                doc.header.counterparty_gstin.clone(),
                doc.header.number.clone(),
                doc.header.date.clone(),
                doc.lines.len().to_string(),
                output::format_amount(doc.totals.taxable_value),
                output::format_amount(doc.totals.total_tax),
                output::format_amount(doc.header.value),
            ]);
        }
        println!("{}", docs);
    }

    report_problems(&outcome);

    if summary.error_rows == 0 && summary.files_failed == 0 {
        output::success("All rows accepted");
    }
    Ok(())
}
