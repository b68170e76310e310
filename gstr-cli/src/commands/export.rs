//! Export command - build the return document from source files

use std::path::PathBuf;

use anyhow::{Context, Result};
use gstr_core::adapters::FileSource;
use gstr_core::DocumentKind;
use tracing::debug;

use super::{get_context, report_problems, resolve_files};
use crate::output;

pub async fn run(
    files: Vec<PathBuf>,
    gstin: &str,
    period: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let ctx = get_context()?;
    let files = resolve_files(files)?;
    let sources: Vec<FileSource> = files.into_iter().map(FileSource::new).collect();

    // Each kind gets its own duplicate tracker
    let invoices = ctx.import_service.process_batch(&sources, DocumentKind::B2b).await;
    let notes = ctx.import_service.process_batch(&sources, DocumentKind::Cdnr).await;

    report_problems(&invoices);
    report_problems(&notes);

    let documents: Vec<_> = invoices
        .documents
        .iter()
        .chain(notes.documents.iter())
        .cloned()
        .collect();

    let doc = ctx
        .assembler
        .assemble(gstin, period, &documents)
        .context("Failed to assemble return document")?;
    debug!(
        b2b = doc.b2b.len(),
        cdnr = doc.cdnr.len(),
        hsn = doc.hsn.as_ref().map_or(0, |h| h.data.len()),
        "Return assembled"
    );
    let content = serde_json::to_string_pretty(&doc)?;

    match out {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {:?}", path))?;
            output::success(&format!(
                "Wrote {} invoice(s) and {} note(s) to {}",
                invoices.documents.len(),
                notes.documents.len(),
                path.display()
            ));
        }
        None => println!("{}", content),
    }

    let rejected = invoices.rejected.len() + notes.rejected.len();
    if rejected > 0 {
        output::warning(&format!("{} rejected row(s) were not exported", rejected));
    }
    Ok(())
}
