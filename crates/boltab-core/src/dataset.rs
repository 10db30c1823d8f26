//! Dynamic string table used on both sides of reconciliation.
//!
//! All cells are strings — no type coercion on read. Column positions are
//! resolved by header name, so the externally supplied dataset may carry
//! its columns in any order.

/// A header row plus data rows, all cells strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create an empty table with the given headers.
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Create a table from headers and rows. Rows shorter than the header
    /// are padded with empty cells; longer rows are truncated.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// The header names in column order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Rename a column in place. Returns whether the column existed.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column(from) {
            Some(idx) => {
                self.headers[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Cell value at (row, column). Empty string when out of range.
    pub fn get(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Overwrite a cell. Out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, column: usize, value: impl Into<String>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = value.into();
        }
    }

    /// Append a row, padding or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Reorder rows according to `order`, a permutation of row indices.
    pub fn reorder_rows(&mut self, order: &[usize]) {
        let reordered = order.iter().map(|&i| self.rows[i].clone()).collect();
        self.rows = reordered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_column_lookup_and_rename() {
        let mut table = DataTable::new(strings(&["Cartons*", "Style"]));
        assert_eq!(table.column("Cartons*"), Some(0));
        assert!(table.rename_column("Cartons*", "Cartons"));
        assert_eq!(table.column("Cartons"), Some(0));
        assert_eq!(table.column("Cartons*"), None);
        assert!(!table.rename_column("Missing", "X"));
    }

    #[test]
    fn test_rows_padded_to_header_width() {
        let table = DataTable::from_rows(
            strings(&["A", "B", "C"]),
            vec![strings(&["1"]), strings(&["1", "2", "3", "4"])],
        );
        assert_eq!(table.rows()[0], strings(&["1", "", ""]));
        assert_eq!(table.rows()[1], strings(&["1", "2", "3"]));
    }

    #[test]
    fn test_get_set() {
        let mut table = DataTable::from_rows(strings(&["A", "B"]), vec![strings(&["1", "2"])]);
        table.set(0, 1, "x");
        assert_eq!(table.get(0, 1), "x");
        assert_eq!(table.get(5, 0), "");
        // Out-of-range writes are ignored.
        table.set(5, 0, "y");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_reorder_rows() {
        let mut table = DataTable::from_rows(
            strings(&["A"]),
            vec![strings(&["x"]), strings(&["y"]), strings(&["z"])],
        );
        table.reorder_rows(&[2, 0, 1]);
        assert_eq!(table.get(0, 0), "z");
        assert_eq!(table.get(1, 0), "x");
        assert_eq!(table.get(2, 0), "y");
    }
}
