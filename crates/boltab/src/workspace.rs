//! A processing run's private working directory.
//!
//! Each run operates on a directory it owns exclusively: page text files
//! go in, per-invoice CSVs and the combined dataset come out. Isolation
//! between concurrent runs is the caller's responsibility — the pipeline
//! never locks because it never sees another run's files.

use std::fs;
use std::path::{Path, PathBuf};

use boltab_core::BolError;

/// Well-known filename of the unified dataset within a workspace.
pub const COMBINED_CSV_NAME: &str = "combined_data.csv";

/// Handle to a run's private directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    /// Open an existing workspace directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, BolError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(BolError::IoError(format!(
                "workspace directory not found: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    /// The workspace directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a file within the workspace.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Path of the combined dataset.
    pub fn combined_csv(&self) -> PathBuf {
        self.dir.join(COMBINED_CSV_NAME)
    }

    /// Page text files (`*.txt`) in page order.
    ///
    /// Files are ordered by numeric stem when possible (`2.txt` before
    /// `10.txt`), falling back to name order, so arrival order matches the
    /// page numbering used by the text-extraction collaborator.
    pub fn page_text_files(&self) -> Result<Vec<PathBuf>, BolError> {
        let mut files = self.files_with_extension("txt")?;
        files.sort_by_key(|path| (numeric_stem(path).unwrap_or(u64::MAX), path.clone()));
        Ok(files)
    }

    /// Per-invoice CSV files, excluding the combined dataset, in name order.
    pub fn invoice_csv_files(&self) -> Result<Vec<PathBuf>, BolError> {
        let mut files: Vec<PathBuf> = self
            .files_with_extension("csv")?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_none_or(|n| n != COMBINED_CSV_NAME)
            })
            .collect();
        files.sort();
        Ok(files)
    }

    fn files_with_extension(&self, extension: &str) -> Result<Vec<PathBuf>, BolError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
            if matches && path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }
}

/// Numeric interpretation of a file stem, when it has one.
fn numeric_stem(path: &Path) -> Option<u64> {
    path.file_stem()?.to_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_directory() {
        let err = Workspace::open("/definitely/not/a/real/dir").unwrap_err();
        assert!(matches!(err, BolError::IoError(_)));
    }

    #[test]
    fn test_page_files_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["10.txt", "2.txt", "1.txt", "notes.csv"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        let ws = Workspace::open(dir.path()).unwrap();
        let names: Vec<String> = ws
            .page_text_files()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["1.txt", "2.txt", "10.txt"]);
    }

    #[test]
    fn test_invoice_csvs_exclude_combined() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["G22222.csv", "G11111.csv", COMBINED_CSV_NAME, "1.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        let ws = Workspace::open(dir.path()).unwrap();
        let names: Vec<String> = ws
            .invoice_csv_files()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["G11111.csv", "G22222.csv"]);
    }
}
