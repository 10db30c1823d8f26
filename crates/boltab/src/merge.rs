//! External order-file intake and reconciliation against the combined
//! dataset.
//!
//! The externally supplied file may be CSV or Excel with columns in any
//! order; every cell is read as a string. The merge itself is pure
//! (`boltab_core::reconcile`); this module only moves bytes in and out of
//! the workspace.

use std::path::Path;

use boltab_core::{BolError, DataTable, ReconcileOptions, ReconcileSummary};
use calamine::{Data, Reader, open_workbook_auto};

use crate::emit::write_table_csv;
use crate::workspace::Workspace;

/// Read a tabular file by extension: `.csv`, `.xlsx`, or `.xls`.
///
/// Anything else is an unsupported extension. An empty file (no header
/// row) is an error before any matching begins.
pub fn read_tabular_file(path: &Path) -> Result<DataTable, BolError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => read_csv_table(path),
        "xlsx" | "xls" => read_excel_table(path),
        "" => Err(BolError::UnsupportedExtension("(none)".to_string())),
        other => Err(BolError::UnsupportedExtension(format!(".{other}"))),
    }
}

/// Merge an external order file into the workspace's combined dataset.
///
/// The combined dataset must already exist (shipment pages processed and
/// combined). On any failure the dataset on disk is left untouched; the
/// updated dataset replaces it atomically only after the merge succeeds.
pub fn reconcile_with_file(
    workspace: &Workspace,
    file: &Path,
    options: &ReconcileOptions,
) -> Result<ReconcileSummary, BolError> {
    let incoming = read_tabular_file(file)?;

    let combined_path = workspace.combined_csv();
    if !combined_path.is_file() {
        return Err(BolError::EmptyInput(
            "no combined dataset in workspace; process shipment pages first".to_string(),
        ));
    }
    let mut combined = read_csv_table(&combined_path)?;

    let summary = boltab_core::reconcile(&mut combined, incoming, options)?;

    write_table_csv(&combined_path, &combined)?;
    Ok(summary)
}

fn read_csv_table(path: &Path) -> Result<DataTable, BolError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| BolError::MalformedInput(e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| BolError::MalformedInput(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(BolError::EmptyInput(format!(
            "{} has no header row",
            path.display()
        )));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| BolError::MalformedInput(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(DataTable::from_rows(headers, rows))
}

fn read_excel_table(path: &Path) -> Result<DataTable, BolError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| BolError::MalformedInput(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| BolError::EmptyInput(format!("{} has no sheets", path.display())))?
        .map_err(|e| BolError::MalformedInput(e.to_string()))?;

    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return Err(BolError::EmptyInput(format!(
            "{} has no header row",
            path.display()
        )));
    };

    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();
    let rows: Vec<Vec<String>> = rows_iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(DataTable::from_rows(headers, rows))
}

/// Render a spreadsheet cell as a string.
///
/// Whole floats lose their trailing `.0` so identifiers read back the way
/// they were typed.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_unsupported_extension() {
        let err = read_tabular_file(Path::new("orders.pdf")).unwrap_err();
        assert_eq!(err, BolError::UnsupportedExtension(".pdf".to_string()));

        let err = read_tabular_file(Path::new("orders")).unwrap_err();
        assert_eq!(err, BolError::UnsupportedExtension("(none)".to_string()));
    }

    #[test]
    fn test_read_csv_table_any_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        fs::write(&path, "Style,Invoice No.\nAB1,G11111\n").unwrap();

        let table = read_tabular_file(&path).unwrap();
        assert_eq!(table.column("Invoice No."), Some(1));
        assert_eq!(table.get(0, 1), "G11111");
    }

    #[test]
    fn test_reconcile_requires_combined_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(dir.path()).unwrap();
        let upload = dir.path().join("orders.csv");
        fs::write(&upload, "Invoice No.\nG11111\n").unwrap();

        let err =
            reconcile_with_file(&ws, &upload, &ReconcileOptions::default()).unwrap_err();
        assert!(matches!(err, BolError::EmptyInput(_)));
    }

    #[test]
    fn test_cell_to_string_whole_floats() {
        assert_eq!(cell_to_string(&Data::Float(720.0)), "720");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
