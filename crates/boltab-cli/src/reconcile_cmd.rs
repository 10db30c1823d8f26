use std::path::Path;

use boltab::ReconcileOptions;

use crate::cli::OutputFormat;
use crate::shared::open_pipeline;

pub fn run(workspace: &Path, file: &Path, format: &OutputFormat) -> Result<(), i32> {
    if !file.is_file() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    let pipeline = open_pipeline(workspace)?;

    let summary = pipeline
        .reconcile(file, &ReconcileOptions::default())
        .map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?;

    match format {
        OutputFormat::Text => {
            println!(
                "Merged order data: {} of {} incoming rows matched",
                summary.matched_rows, summary.incoming_rows,
            );
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "incoming_rows": summary.incoming_rows,
                "matched_rows": summary.matched_rows,
            });
            println!("{json}");
        }
    }

    Ok(())
}
