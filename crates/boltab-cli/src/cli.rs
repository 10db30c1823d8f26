use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Extract shipment tables from BOL page text and reconcile them with
/// order data.
#[derive(Debug, Parser)]
#[command(name = "boltab", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse page text files, emit per-invoice CSVs, and combine them
    Process {
        /// Run workspace directory containing numbered page text files
        #[arg(value_name = "WORKSPACE")]
        workspace: PathBuf,

        /// Page text files loaded per batch
        #[arg(long, default_value_t = 10)]
        page_batch_size: usize,

        /// Skip the combine stage, leaving per-invoice CSVs in place
        #[arg(long)]
        no_combine: bool,

        /// Output format for the run summary
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Combine per-invoice CSVs into the unified dataset
    Combine {
        /// Run workspace directory
        #[arg(value_name = "WORKSPACE")]
        workspace: PathBuf,

        /// Source files folded in per batch
        #[arg(long, default_value_t = 5)]
        batch_size: usize,

        /// Output format for the summary
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Merge an external CSV/Excel order file into the combined dataset
    Reconcile {
        /// Run workspace directory holding the combined dataset
        #[arg(value_name = "WORKSPACE")]
        workspace: PathBuf,

        /// External order file (.csv, .xlsx, or .xls)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format for the summary
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Parse a single page text file and print what was extracted
    Parse {
        /// Path to one page's extracted text
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

/// Output format for command results.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
