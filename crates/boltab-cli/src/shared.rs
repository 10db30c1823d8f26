use std::path::Path;

use boltab::{Pipeline, ScanWarning, Workspace};

/// Open a run workspace, mapping failure to an exit code.
pub fn open_pipeline(dir: &Path) -> Result<Pipeline, i32> {
    let workspace = Workspace::open(dir).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    Ok(Pipeline::new(workspace))
}

/// Print collected warnings to stderr.
pub fn report_warnings(warnings: &[ScanWarning]) {
    for warning in warnings {
        eprintln!("Warning: {warning}");
    }
}
