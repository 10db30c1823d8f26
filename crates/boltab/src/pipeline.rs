//! End-to-end processing of one run's workspace.
//!
//! Three stages, each run to completion before the next: collect rows from
//! page text (bounded batches), emit one CSV per invoice, then combine.
//! Reconciliation runs later, when the external order file arrives.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use boltab_core::{
    Aggregator, BolError, OutputRow, ReconcileOptions, ReconcileSummary, ScanWarning,
    ScanWarningCode, place_totals, runs_by,
};

use crate::combine::{CombineOptions, CombineSummary, combine};
use crate::emit::write_rows_csv;
use crate::merge::reconcile_with_file;
use crate::workspace::Workspace;

/// Configuration for the page-processing stage.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Number of page text files loaded per batch (default: 10). Each
    /// batch's text buffers are released before the next batch loads.
    pub page_batch_size: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self { page_batch_size: 10 }
    }
}

/// Counts and warnings reported after a page-processing pass.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Page text files fed to the aggregator.
    pub pages_seen: usize,
    /// Pages skipped for missing invoice number or table header.
    pub pages_skipped: usize,
    /// Invoices that produced a CSV.
    pub invoices_written: usize,
    /// Invoices dropped because no rows were extracted.
    pub invoices_skipped: usize,
    /// Data rows written across all invoice CSVs.
    pub rows_written: usize,
    /// All warnings absorbed during the pass.
    pub warnings: Vec<ScanWarning>,
}

/// Orchestrates the stages of one run over its private workspace.
#[derive(Debug)]
pub struct Pipeline {
    workspace: Workspace,
}

impl Pipeline {
    /// Create a pipeline over an opened workspace.
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    /// The pipeline's workspace.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Parse all page text files and emit one CSV per invoice.
    ///
    /// Pages are loaded in bounded batches. Per-page and per-invoice
    /// problems become warnings; the pass only fails on I/O errors or a
    /// workspace with no page text at all. Consumed page text files are
    /// deleted after every invoice CSV has been written.
    pub fn process_pages(&self, options: &ProcessOptions) -> Result<RunSummary, BolError> {
        let files = self.workspace.page_text_files()?;
        if files.is_empty() {
            return Err(BolError::EmptyInput(
                "no page text files in workspace".to_string(),
            ));
        }

        let mut aggregator = Aggregator::new();
        let mut page_number = 0;
        for batch in files.chunks(options.page_batch_size.max(1)) {
            // One batch of page text is resident at a time.
            let texts: Vec<String> = batch
                .iter()
                .map(fs::read_to_string)
                .collect::<Result<_, _>>()?;
            for text in &texts {
                page_number += 1;
                aggregator.add_page(page_number, text);
            }
        }

        let pages_seen = aggregator.pages_seen();
        let pages_skipped = aggregator.pages_skipped();
        let scan = aggregator.finish();
        let invoices = scan.value;
        let mut warnings = scan.warnings;
        let invoices_skipped = warnings
            .iter()
            .filter(|w| w.code == ScanWarningCode::EmptyInvoice)
            .count();

        // Assemble every invoice's rows in invoice-number order, then place
        // totals on the head row of each invoice run.
        let mut rows: Vec<OutputRow> = Vec::new();
        let mut totals = BTreeMap::new();
        for (invoice_no, record) in &invoices {
            let resolved = record.resolve_totals();
            rows.extend(
                record
                    .pages
                    .iter()
                    .flat_map(|page| &page.rows)
                    .map(|row| OutputRow::from_parsed(invoice_no, &resolved.bol_cube, row)),
            );
            totals.insert(invoice_no.clone(), resolved);
        }
        place_totals(&mut rows, &totals);

        let mut invoices_written = 0;
        let mut rows_written = 0;
        for run in runs_by(&rows, |row| row.invoice_no.clone()) {
            let invoice_rows = &rows[run];
            let path = self
                .workspace
                .path_of(&format!("{}.csv", invoice_rows[0].invoice_no));
            rows_written += write_rows_csv(&path, invoice_rows)?;
            invoices_written += 1;
        }

        // Page text is only consumed once every invoice CSV is in place.
        for path in &files {
            if let Err(err) = fs::remove_file(path) {
                warnings.push(ScanWarning::new(format!(
                    "could not remove {}: {err}",
                    path.display()
                )));
            }
        }

        Ok(RunSummary {
            pages_seen,
            pages_skipped,
            invoices_written,
            invoices_skipped,
            rows_written,
            warnings,
        })
    }

    /// Combine the emitted per-invoice CSVs into the unified dataset.
    pub fn combine(&self, options: &CombineOptions) -> Result<CombineSummary, BolError> {
        combine(&self.workspace, options)
    }

    /// Merge an external order file into the combined dataset.
    pub fn reconcile(
        &self,
        file: &Path,
        options: &ReconcileOptions,
    ) -> Result<ReconcileSummary, BolError> {
        reconcile_with_file(&self.workspace, file, options)
    }
}
