//! gstr CLI - GST return builder in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gstr_core::DocumentKind;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{export, hsn, import};

/// gstr - turn invoice spreadsheets into GST return documents
#[derive(Parser)]
#[command(name = "gstr", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and group invoices or notes from source files
    Import {
        /// Source files (.csv, .xlsx, .xls, .ods, .json); read from stdin when omitted
        files: Vec<PathBuf>,
        /// Document kind: b2b or cdnr
        #[arg(long, default_value = "b2b")]
        kind: DocumentKind,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the return document from source files
    Export {
        /// Source files; read from stdin when omitted
        files: Vec<PathBuf>,
        /// Supplier GSTIN
        #[arg(long, env = "GSTR_GSTIN")]
        gstin: String,
        /// Filing period as MMYYYY
        #[arg(long)]
        period: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Look up an HSN/SAC classification code
    Hsn {
        /// Code to resolve (2, 4, 6 or 8 digits)
        code: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("GSTR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Import { files, kind, json } => import::run(files, kind, json).await,
        Commands::Export { files, gstin, period, output } => {
            export::run(files, &gstin, &period, output).await
        }
        Commands::Hsn { code, json } => hsn::run(&code, json),
    }
}
