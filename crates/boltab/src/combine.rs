//! Batched combination of per-invoice CSVs into the unified dataset.
//!
//! Sources are folded in fixed-size batches to bound peak memory: each
//! batch is read fully, appended to the output (header written once), and
//! its source files are deleted before the next batch loads.

use std::fs;
use std::path::{Path, PathBuf};

use boltab_core::{BolError, Column};

use crate::workspace::Workspace;

/// Configuration for the combine stage.
#[derive(Debug, Clone)]
pub struct CombineOptions {
    /// Number of source files folded in per batch (default: 5).
    pub batch_size: usize,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self { batch_size: 5 }
    }
}

/// Counts reported after a combine pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombineSummary {
    /// Source files folded into the output.
    pub files_combined: usize,
    /// Source files skipped because they could not be parsed.
    pub files_skipped: usize,
    /// Data records written to the combined dataset.
    pub rows_written: usize,
}

/// Combine all per-invoice CSVs in the workspace into the unified dataset.
///
/// Fails when the workspace holds no source files, or when none of them
/// yields a parseable row; the combined dataset is only promoted to its
/// final name after a fully successful pass. Unparseable sources are
/// skipped (and kept on disk); consumed sources are deleted batch by
/// batch.
pub fn combine(workspace: &Workspace, options: &CombineOptions) -> Result<CombineSummary, BolError> {
    let sources = workspace.invoice_csv_files()?;
    if sources.is_empty() {
        return Err(BolError::EmptyInput(
            "no invoice CSV files to combine".to_string(),
        ));
    }

    let output = workspace.combined_csv();
    let staging = output.with_extension("tmp");
    let mut writer = csv::Writer::from_path(&staging)
        .map_err(|e| BolError::IoError(e.to_string()))?;
    writer
        .write_record(Column::header())
        .map_err(|e| BolError::IoError(e.to_string()))?;

    let mut summary = CombineSummary {
        files_combined: 0,
        files_skipped: 0,
        rows_written: 0,
    };

    for batch in sources.chunks(options.batch_size.max(1)) {
        let mut consumed: Vec<PathBuf> = Vec::new();

        for source in batch {
            match read_records(source) {
                Ok(records) => {
                    for record in &records {
                        writer
                            .write_record(record)
                            .map_err(|e| BolError::IoError(e.to_string()))?;
                    }
                    summary.files_combined += 1;
                    summary.rows_written += records.len();
                    consumed.push(source.clone());
                }
                Err(_) => {
                    summary.files_skipped += 1;
                }
            }
        }

        // Discard this batch's sources before loading the next batch.
        for source in consumed {
            let _ = fs::remove_file(source);
        }
    }

    writer.flush()?;
    drop(writer);

    if summary.rows_written == 0 {
        let _ = fs::remove_file(&staging);
        return Err(BolError::EmptyInput(
            "no parseable rows in any input file".to_string(),
        ));
    }

    fs::rename(&staging, &output)?;
    Ok(summary)
}

/// Read all data records of one source file, or fail the file as a whole.
fn read_records(path: &Path) -> Result<Vec<csv::StringRecord>, BolError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| BolError::MalformedInput(e.to_string()))?;

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record.map_err(|e| BolError::MalformedInput(e.to_string()))?);
    }
    Ok(records)
}
