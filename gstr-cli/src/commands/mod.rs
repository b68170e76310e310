//! CLI command implementations

pub mod export;
pub mod hsn;
pub mod import;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use gstr_core::services::ImportOutcome;
use gstr_core::GstrContext;

use crate::output;

/// Get the gstr directory from environment or default
pub fn get_gstr_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("GSTR_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gstr")
    }
}

/// Get or create the gstr context
pub fn get_context() -> Result<GstrContext> {
    let gstr_dir = get_gstr_dir();

    std::fs::create_dir_all(&gstr_dir)
        .with_context(|| format!("Failed to create gstr directory: {:?}", gstr_dir))?;

    GstrContext::new(&gstr_dir).context("Failed to initialize gstr context")
}

/// File list from arguments, or one path per line on stdin when piped
pub fn resolve_files(files: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let files = if files.is_empty() && atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect()
    } else {
        files
    };

    if files.is_empty() {
        anyhow::bail!("No input files provided. Pass paths or pipe them on stdin.");
    }
    Ok(files)
}

/// Print failed files and rejected rows of an import
pub fn report_problems(outcome: &ImportOutcome) {
    for file in &outcome.files {
        if let Some(error) = &file.error {
            output::error(&format!("{}: {}", file.name, error));
        }
    }

    if outcome.rejected.is_empty() {
        return;
    }

    output::warning(&format!(
        "{} {} row(s) rejected",
        outcome.rejected.len(),
        outcome.kind
    ));

    let mut table = output::create_table();
    table.set_header(vec!["File", "Row", "Problems"]);
    for pending in outcome.rejected.rows() {
        table.add_row(vec![
            pending.error.source.clone(),
            pending.error.row_number.to_string(),
            pending.error.messages.join("\n"),
        ]);
    }
    eprintln!("{}", table);
}
