//! CSV serialization of output rows.
//!
//! Files are written to a sibling temporary path and promoted by rename
//! only once fully written, so a failed stage never leaves a partial file
//! under a final name.

use std::fs;
use std::path::{Path, PathBuf};

use boltab_core::{BolError, Column, DataTable, OutputRow};

/// Temporary sibling used while writing `path`.
fn staging_path(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

fn write_err(err: csv::Error) -> BolError {
    BolError::IoError(err.to_string())
}

/// Write the fixed header plus one record per row, atomically.
///
/// Returns the number of data records written.
pub fn write_rows_csv(path: &Path, rows: &[OutputRow]) -> Result<usize, BolError> {
    let staging = staging_path(path);
    let mut writer = csv::Writer::from_path(&staging).map_err(write_err)?;

    writer.write_record(Column::header()).map_err(write_err)?;
    for row in rows {
        writer.write_record(row.to_record()).map_err(write_err)?;
    }
    writer.flush()?;
    drop(writer);

    fs::rename(&staging, path)?;
    Ok(rows.len())
}

/// Write a dynamic table (headers plus rows), atomically.
pub fn write_table_csv(path: &Path, table: &DataTable) -> Result<(), BolError> {
    let staging = staging_path(path);
    let mut writer = csv::Writer::from_path(&staging).map_err(write_err)?;

    writer.write_record(table.headers()).map_err(write_err)?;
    for row in table.rows() {
        writer.write_record(row).map_err(write_err)?;
    }
    writer.flush()?;
    drop(writer);

    fs::rename(&staging, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boltab_core::ParsedRow;

    #[test]
    fn test_write_rows_header_and_promotion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("G12345.csv");

        let rows = vec![OutputRow::from_parsed(
            "G12345",
            "161.00",
            &ParsedRow {
                cartons: "30".to_string(),
                style: "AB123".to_string(),
                individual_pieces: "720".to_string(),
                individual_weight: "200.0".to_string(),
            },
        )];

        assert_eq!(write_rows_csv(&path, &rows).unwrap(), 1);
        assert!(path.is_file());
        assert!(!staging_path(&path).exists());

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("RTS ID,RTS Status,"));
        let data = lines.next().unwrap();
        assert!(data.contains("G12345"));
        assert!(data.contains("161.00"));
    }

    #[test]
    fn test_write_table_round_trips_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");

        let table = DataTable::from_rows(
            vec!["A".to_string(), "B".to_string()],
            vec![vec!["1".to_string(), "with,comma".to_string()]],
        );
        write_table_csv(&path, &table).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[1], "with,comma");
    }
}
