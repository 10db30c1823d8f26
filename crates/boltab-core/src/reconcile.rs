//! Record matching and merge of externally supplied order data.
//!
//! The combined dataset (from parsed shipment pages) and the incoming
//! order dataset share four business fields; rows are joined on a
//! normalized composite key built from them. Matched rows receive five
//! mapped fields, every invoice run gets derived logistics fields on its
//! head row, and the dataset is re-sorted by destination urgency.

use std::collections::HashMap;

use crate::dataset::DataTable;
use crate::dates::{CancelDate, parse_cancel_date};
use crate::error::{BolError, TableSide};
use crate::layout::{Column, runs_by};

/// Column renames applied to the incoming dataset before matching.
pub const COLUMN_RENAMES: [(&str, &str); 2] =
    [("Cartons*", "Cartons"), ("Pieces*", "Individual Pieces")];

/// Incoming-to-combined field mapping copied on a key match.
pub const FIELD_MAP: [(&str, &str); 5] = [
    ("Invoice Date", "Order Date"),
    ("Ship-to Name", "Ship To Name"),
    ("Order No.", "Purchase Order No."),
    ("Delivery Date", "Start Date"),
    ("Cancel Date", "Cancel Date"),
];

/// The four shared columns forming the composite match key.
pub fn key_columns() -> [&'static str; 4] {
    [
        Column::InvoiceNo.name(),
        Column::Style.name(),
        Column::Cartons.name(),
        Column::IndividualPieces.name(),
    ]
}

/// Tunables for the derived logistics fields.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Cube volume absorbed by one pallet (default: 80).
    pub pallet_cube_divisor: f64,
    /// Per-pallet cube multiplier for Burlington destinations (default: 93).
    pub burlington_factor: i64,
    /// Per-pallet cube multiplier for all other destinations (default: 130).
    pub final_factor: i64,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            pallet_cube_divisor: 80.0,
            burlington_factor: 93,
            final_factor: 130,
        }
    }
}

/// Counts reported after a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Rows in the incoming dataset.
    pub incoming_rows: usize,
    /// Incoming rows that matched a combined row.
    pub matched_rows: usize,
}

/// Normalize one key field: trim, strip commas, lowercase.
fn normalize_key_field(value: &str) -> String {
    value.trim().replace(',', "").to_lowercase()
}

/// Build the composite match key from field values in key-column order.
///
/// The same normalization is applied on both datasets, so keys are equal
/// whenever the four fields agree up to casing, embedded commas, and
/// surrounding whitespace.
pub fn match_key<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(normalize_key_field)
        .collect::<Vec<_>>()
        .join("_")
}

fn table_key(table: &DataTable, row: usize, columns: &[usize; 4]) -> String {
    match_key(columns.iter().map(|&c| table.get(row, c)))
}

fn key_column_indices(table: &DataTable, side: TableSide) -> Result<[usize; 4], BolError> {
    let mut indices = [0usize; 4];
    for (slot, name) in indices.iter_mut().zip(key_columns()) {
        *slot = table.column(name).ok_or_else(|| BolError::MissingColumn {
            column: name.to_string(),
            table: side,
        })?;
    }
    Ok(indices)
}

/// Pallet count for a BOL cube value: ceiling(cube / divisor).
///
/// A non-numeric or missing cube yields `None` (a blank cell downstream),
/// never an error.
pub fn compute_pallet(bol_cube: &str, divisor: f64) -> Option<i64> {
    let cleaned = bol_cube.replace(',', "");
    let value: f64 = cleaned.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some((value / divisor).ceil() as i64)
}

/// Burlington cube: pallet count times the Burlington factor, only for
/// destinations whose name contains "burlington" (case-insensitive).
pub fn compute_burlington(ship_to_name: &str, pallet: Option<i64>, factor: i64) -> Option<i64> {
    if ship_to_name.to_lowercase().contains("burlington") {
        Some(pallet? * factor)
    } else {
        None
    }
}

/// Final cube: pallet count times the final factor, only for destinations
/// whose name does NOT contain "burlington".
pub fn compute_final_cube(ship_to_name: &str, pallet: Option<i64>, factor: i64) -> Option<i64> {
    if ship_to_name.to_lowercase().contains("burlington") {
        None
    } else {
        Some(pallet? * factor)
    }
}

/// Merge the incoming order dataset into the combined dataset.
///
/// 1. Renames `Cartons*`/`Pieces*` on the incoming side, then validates
///    that both sides carry all four key columns (a missing column aborts
///    with the combined dataset untouched on disk — the caller only
///    persists on success).
/// 2. For each incoming row in order, the FIRST combined row with an equal
///    match key receives the five mapped fields, overwriting existing
///    values. Incoming rows without a match are dropped silently.
/// 3. Derived fields are computed per row and materialized only on the
///    head row of each contiguous invoice run (the dataset is already
///    ordered with same-invoice rows adjacent).
/// 4. The dataset is re-sorted by (earliest cancel date of the rows
///    sharing a Ship To Name, Ship To Name, the row's own cancel date).
///    Skipped when either sort column is absent.
pub fn reconcile(
    combined: &mut DataTable,
    mut incoming: DataTable,
    options: &ReconcileOptions,
) -> Result<ReconcileSummary, BolError> {
    for (from, to) in COLUMN_RENAMES {
        incoming.rename_column(from, to);
    }

    let combined_key_cols = key_column_indices(combined, TableSide::Combined)?;
    let incoming_key_cols = key_column_indices(&incoming, TableSide::Incoming)?;

    let combined_keys: Vec<String> = (0..combined.len())
        .map(|row| table_key(combined, row, &combined_key_cols))
        .collect();

    // Resolve the mapped column pairs present on both sides.
    let field_columns: Vec<(usize, usize)> = FIELD_MAP
        .iter()
        .filter_map(|(src, dst)| Some((incoming.column(src)?, combined.column(dst)?)))
        .collect();

    let mut matched_rows = 0;
    for inc_row in 0..incoming.len() {
        let key = table_key(&incoming, inc_row, &incoming_key_cols);
        let Some(target) = combined_keys.iter().position(|k| *k == key) else {
            continue;
        };
        matched_rows += 1;
        for &(src, dst) in &field_columns {
            let value = incoming.get(inc_row, src).to_string();
            combined.set(target, dst, value);
        }
    }

    apply_derived_fields(combined, &combined_key_cols, options);
    sort_by_destination(combined);

    Ok(ReconcileSummary {
        incoming_rows: incoming.len(),
        matched_rows,
    })
}

/// Compute Pallet / Burlington Cube / Final Cube for every row, then
/// materialize them only on the head row of each contiguous invoice run.
fn apply_derived_fields(
    combined: &mut DataTable,
    combined_key_cols: &[usize; 4],
    options: &ReconcileOptions,
) {
    let bol_cube_col = combined.column(Column::BolCube.name());
    let ship_col = combined.column(Column::ShipToName.name());

    let pallets: Vec<Option<i64>> = (0..combined.len())
        .map(|row| {
            bol_cube_col
                .and_then(|c| compute_pallet(combined.get(row, c), options.pallet_cube_divisor))
        })
        .collect();

    let burlington: Vec<Option<i64>> = (0..combined.len())
        .map(|row| {
            ship_col.and_then(|c| {
                compute_burlington(combined.get(row, c), pallets[row], options.burlington_factor)
            })
        })
        .collect();

    let final_cube: Vec<Option<i64>> = (0..combined.len())
        .map(|row| {
            ship_col.and_then(|c| {
                compute_final_cube(combined.get(row, c), pallets[row], options.final_factor)
            })
        })
        .collect();

    let targets = [
        (Column::Pallet, pallets),
        (Column::BurlingtonCube, burlington),
        (Column::FinalCube, final_cube),
    ];

    let invoice_col = combined_key_cols[0];
    let invoices: Vec<String> = (0..combined.len())
        .map(|row| combined.get(row, invoice_col).to_string())
        .collect();
    let runs = runs_by(&invoices, |v| v.clone());

    for (column, values) in targets {
        let Some(col) = combined.column(column.name()) else {
            continue;
        };
        for row in 0..combined.len() {
            combined.set(row, col, "");
        }
        for run in &runs {
            let head = run.start;
            if let Some(value) = values[head] {
                combined.set(head, col, value.to_string());
            }
        }
    }
}

/// Stable-sort rows by (group-minimum cancel date per Ship To Name,
/// Ship To Name, the row's own cancel date).
///
/// The group minimum ignores invalid dates; a destination with no valid
/// date sorts last. Skipped when either sort column is missing. Helper
/// sort keys are never written into the table.
fn sort_by_destination(combined: &mut DataTable) {
    let (Some(date_col), Some(ship_col)) = (
        combined.column(Column::CancelDate.name()),
        combined.column(Column::ShipToName.name()),
    ) else {
        return;
    };

    let dates: Vec<CancelDate> = (0..combined.len())
        .map(|row| parse_cancel_date(combined.get(row, date_col)))
        .collect();

    let mut group_min: HashMap<String, CancelDate> = HashMap::new();
    for row in 0..combined.len() {
        let name = combined.get(row, ship_col).to_string();
        let entry = group_min.entry(name).or_insert_with(CancelDate::invalid);
        if dates[row] < *entry {
            *entry = dates[row];
        }
    }

    let mut order: Vec<usize> = (0..combined.len()).collect();
    order.sort_by(|&a, &b| {
        let name_a = combined.get(a, ship_col);
        let name_b = combined.get(b, ship_col);
        group_min[name_a]
            .cmp(&group_min[name_b])
            .then_with(|| name_a.cmp(name_b))
            .then_with(|| dates[a].cmp(&dates[b]))
    });

    combined.reorder_rows(&order);
}
