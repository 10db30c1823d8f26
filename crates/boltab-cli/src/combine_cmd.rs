use std::path::Path;

use boltab::CombineOptions;

use crate::cli::OutputFormat;
use crate::shared::open_pipeline;

pub fn run(workspace: &Path, batch_size: usize, format: &OutputFormat) -> Result<(), i32> {
    let pipeline = open_pipeline(workspace)?;

    let summary = pipeline
        .combine(&CombineOptions { batch_size })
        .map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?;

    match format {
        OutputFormat::Text => {
            println!(
                "Combined {} files into the unified dataset ({} rows, {} files skipped)",
                summary.files_combined, summary.rows_written, summary.files_skipped,
            );
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "files_combined": summary.files_combined,
                "files_skipped": summary.files_skipped,
                "rows_written": summary.rows_written,
            });
            println!("{json}");
        }
    }

    Ok(())
}
