//! boltab: Extract shipment tables from Bill-of-Lading page text and
//! reconcile them with order data.
//!
//! This is the pipeline facade crate. It owns a run's private workspace
//! directory and drives the stages over it; all parsing, aggregation, and
//! matching logic lives in boltab-core.
//!
//! # Architecture
//!
//! - **boltab-core**: I/O-independent data types and algorithms
//! - **boltab** (this crate): workspace handling, CSV/Excel intake, staged
//!   outputs with atomic promotion
//!
//! # Example
//!
//! ```ignore
//! let workspace = Workspace::open("/runs/session_42")?;
//! let pipeline = Pipeline::new(workspace);
//! let summary = pipeline.process_pages(&ProcessOptions::default())?;
//! pipeline.combine(&CombineOptions::default())?;
//! pipeline.reconcile(Path::new("orders.xlsx"), &ReconcileOptions::default())?;
//! ```

mod combine;
mod emit;
mod merge;
mod pipeline;
mod workspace;

pub use boltab_core;

pub use boltab_core::{
    BolError, Column, DataTable, OutputRow, PageExtraction, PageParser, ParsedRow,
    ReconcileOptions, ReconcileSummary, ScanWarning, ScanWarningCode,
};
pub use combine::{CombineOptions, CombineSummary};
pub use emit::{write_rows_csv, write_table_csv};
pub use merge::read_tabular_file;
pub use pipeline::{Pipeline, ProcessOptions, RunSummary};
pub use workspace::{COMBINED_CSV_NAME, Workspace};
