use std::path::Path;

use boltab::{CombineOptions, CombineSummary, ProcessOptions, RunSummary};

use crate::cli::OutputFormat;
use crate::shared::{open_pipeline, report_warnings};

pub fn run(
    workspace: &Path,
    page_batch_size: usize,
    no_combine: bool,
    format: &OutputFormat,
) -> Result<(), i32> {
    let pipeline = open_pipeline(workspace)?;

    let summary = pipeline
        .process_pages(&ProcessOptions { page_batch_size })
        .map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?;
    report_warnings(&summary.warnings);

    let combined = if no_combine {
        None
    } else {
        Some(pipeline.combine(&CombineOptions::default()).map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?)
    };

    match format {
        OutputFormat::Text => write_text(&summary, combined.as_ref()),
        OutputFormat::Json => write_json(&summary, combined.as_ref()),
    }

    Ok(())
}

fn write_text(summary: &RunSummary, combined: Option<&CombineSummary>) {
    println!(
        "Processed {} pages ({} skipped): {} invoices, {} rows",
        summary.pages_seen, summary.pages_skipped, summary.invoices_written, summary.rows_written,
    );
    if summary.invoices_skipped > 0 {
        println!("{} invoices had no extractable rows", summary.invoices_skipped);
    }
    if let Some(combined) = combined {
        println!(
            "Combined {} files into the unified dataset ({} rows)",
            combined.files_combined, combined.rows_written,
        );
    }
}

fn write_json(summary: &RunSummary, combined: Option<&CombineSummary>) {
    let combined = combined.map(|c| {
        serde_json::json!({
            "files_combined": c.files_combined,
            "files_skipped": c.files_skipped,
            "rows_written": c.rows_written,
        })
    });

    let json = serde_json::json!({
        "pages_seen": summary.pages_seen,
        "pages_skipped": summary.pages_skipped,
        "invoices_written": summary.invoices_written,
        "invoices_skipped": summary.invoices_skipped,
        "rows_written": summary.rows_written,
        "warnings": summary.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        "combined": combined,
    });
    println!("{json}");
}
