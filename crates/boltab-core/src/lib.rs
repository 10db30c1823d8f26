//! boltab-core: I/O-independent data types and algorithms.
//!
//! This crate provides the foundational types (ParsedRow, PageExtraction,
//! InvoiceRecord, OutputRow, DataTable) and algorithms (row classification,
//! page table recovery, invoice aggregation, record matching, derived
//! logistics fields, destination sorting) used by boltab. It performs no
//! file I/O — page text goes in, tabular records come out.

mod dataset;
mod dates;
mod error;
mod invoice;
mod layout;
mod page;
mod reconcile;
mod row;

pub use dataset::DataTable;
pub use dates::{CancelDate, parse_cancel_date};
pub use error::{BolError, ScanResult, ScanWarning, ScanWarningCode, TableSide};
pub use invoice::{Aggregator, InvoiceRecord, ResolvedTotals};
pub use layout::{COLUMN_COUNT, Column, OutputRow, place_totals, runs_by};
pub use page::{PageExtraction, PageParser, PageTotals};
pub use reconcile::{
    COLUMN_RENAMES, FIELD_MAP, ReconcileOptions, ReconcileSummary, compute_burlington,
    compute_final_cube, compute_pallet, key_columns, match_key, reconcile,
};
pub use row::{ParsedRow, RowClassifier};
