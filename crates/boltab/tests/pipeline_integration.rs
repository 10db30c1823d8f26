//! End-to-end pipeline tests: page text in, reconciled dataset out.

use std::fs;
use std::path::Path;

use boltab::{
    COMBINED_CSV_NAME, CombineOptions, Pipeline, ProcessOptions, ReconcileOptions, Workspace,
};
use boltab_core::Column;

/// First page of invoice G11111: two rows, no totals line.
fn page_one() -> &'static str {
    "ACME APPAREL CO\n\
     BILL OF LADING G11111\n\
     SHIP TO: KOHLS E-COMM\n\
     CARTONS STYLE PIECES WEIGHT\n\
     30 AB123 720 595.2\n\
     12 CD456 480 130.5\n\
     Page 1 of 2"
}

/// Second page of invoice G11111: one row, totals line, cube above the
/// shipping instructions marker.
fn page_two() -> &'static str {
    "ACME APPAREL CO\n\
     BILL OF LADING G11111\n\
     CARTONS STYLE PIECES WEIGHT\n\
     8 EF789 200 61.3\n\
     50 TOTAL CARTONS 1,400 TOTAL PIECES TOTAL VOL / WGT 787.0\n\
     161.00\n\
     SHIPPING INSTRUCTIONS: call before delivery"
}

/// Single page of invoice G22222: two rows, no totals line — totals fall
/// back to summation.
fn page_three() -> &'static str {
    "ACME APPAREL CO\n\
     BILL OF LADING G22222\n\
     CARTONS STYLE PIECES WEIGHT\n\
     7 GH111 140 55.5\n\
     3 GH222 60 20.25\n\
     88.00\n\
     SHIPPING INSTRUCTIONS: none"
}

fn seeded_pipeline(dir: &Path) -> Pipeline {
    fs::write(dir.join("1.txt"), page_one()).unwrap();
    fs::write(dir.join("2.txt"), page_two()).unwrap();
    fs::write(dir.join("3.txt"), page_three()).unwrap();
    Pipeline::new(Workspace::open(dir).unwrap())
}

fn read_combined(dir: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(dir.join(COMBINED_CSV_NAME)).unwrap();
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn cell<'a>(row: &'a [String], column: Column) -> &'a str {
    &row[column.index()]
}

#[test]
fn test_process_and_combine() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = seeded_pipeline(dir.path());

    let summary = pipeline.process_pages(&ProcessOptions::default()).unwrap();
    assert_eq!(summary.pages_seen, 3);
    assert_eq!(summary.pages_skipped, 0);
    assert_eq!(summary.invoices_written, 2);
    assert_eq!(summary.rows_written, 5);
    assert!(summary.warnings.is_empty());

    // Page text was consumed; per-invoice CSVs exist.
    assert!(!dir.path().join("1.txt").exists());
    assert!(dir.path().join("G11111.csv").is_file());
    assert!(dir.path().join("G22222.csv").is_file());

    let combined = pipeline.combine(&CombineOptions::default()).unwrap();
    assert_eq!(combined.files_combined, 2);
    assert_eq!(combined.rows_written, 5);

    let (headers, rows) = read_combined(dir.path());
    assert_eq!(headers.len(), 28);
    assert_eq!(rows.len(), 5);

    // Invoice G11111 first (invoice-number order), totals from its second
    // page on the head row only, and that page's cube on every row.
    assert_eq!(cell(&rows[0], Column::InvoiceNo), "G11111");
    assert_eq!(cell(&rows[0], Column::Style), "AB123");
    assert_eq!(cell(&rows[0], Column::TotalPieces), "1400");
    assert_eq!(cell(&rows[0], Column::TotalWeight), "787.0");
    assert_eq!(cell(&rows[0], Column::BolCube), "161.00");
    assert_eq!(cell(&rows[1], Column::TotalPieces), "");
    assert_eq!(cell(&rows[1], Column::BolCube), "161.00");
    assert_eq!(cell(&rows[2], Column::Style), "EF789");

    // Invoice G22222: summed totals, cube from its only page.
    assert_eq!(cell(&rows[3], Column::InvoiceNo), "G22222");
    assert_eq!(cell(&rows[3], Column::TotalPieces), "200");
    assert_eq!(cell(&rows[3], Column::TotalWeight), "75.75");
    assert_eq!(cell(&rows[3], Column::BolCube), "88.00");
    assert_eq!(cell(&rows[4], Column::TotalPieces), "");
}

#[test]
fn test_reconcile_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = seeded_pipeline(dir.path());
    pipeline.process_pages(&ProcessOptions::default()).unwrap();
    pipeline.combine(&CombineOptions::default()).unwrap();

    // External order data covers only invoice G11111.
    let upload = dir.path().join("orders.csv");
    fs::write(
        &upload,
        "Invoice No.,Style,Cartons*,Pieces*,Invoice Date,Ship-to Name,Order No.,Delivery Date,Cancel Date\n\
         G11111,AB123,30,720,1022025,Kohl's,PO-1,2152025,3152025\n\
         G11111,CD456,12,480,1022025,Kohl's,PO-1,2152025,3152025\n\
         G11111,EF789,8,200,1022025,Kohl's,PO-1,2152025,3152025\n",
    )
    .unwrap();

    let summary = pipeline
        .reconcile(&upload, &ReconcileOptions::default())
        .unwrap();
    assert_eq!(summary.incoming_rows, 3);
    assert_eq!(summary.matched_rows, 3);

    let (_, rows) = read_combined(dir.path());
    assert_eq!(rows.len(), 5);

    // Matched invoice sorts first (valid cancel dates); its mapped fields
    // are fully overwritten.
    assert_eq!(cell(&rows[0], Column::InvoiceNo), "G11111");
    assert_eq!(cell(&rows[0], Column::OrderDate), "1022025");
    assert_eq!(cell(&rows[0], Column::ShipToName), "Kohl's");
    assert_eq!(cell(&rows[0], Column::PurchaseOrderNo), "PO-1");
    assert_eq!(cell(&rows[0], Column::StartDate), "2152025");
    assert_eq!(cell(&rows[0], Column::CancelDate), "3152025");

    // Derived fields on the head row only: ceil(161/80) = 3 pallets, a
    // non-Burlington destination gets Final Cube 3 * 130.
    assert_eq!(cell(&rows[0], Column::Pallet), "3");
    assert_eq!(cell(&rows[0], Column::FinalCube), "390");
    assert_eq!(cell(&rows[0], Column::BurlingtonCube), "");
    assert_eq!(cell(&rows[1], Column::Pallet), "");
    assert_eq!(cell(&rows[1], Column::FinalCube), "");

    // Unmatched invoice: mapped fields untouched, totals intact, and its
    // head row still gets cube-derived fields (ceil(88/80) = 2 pallets).
    assert_eq!(cell(&rows[3], Column::InvoiceNo), "G22222");
    assert_eq!(cell(&rows[3], Column::ShipToName), "");
    assert_eq!(cell(&rows[3], Column::OrderDate), "");
    assert_eq!(cell(&rows[3], Column::TotalPieces), "200");
    assert_eq!(cell(&rows[3], Column::Pallet), "2");
    assert_eq!(cell(&rows[3], Column::FinalCube), "260");
}

#[test]
fn test_unparseable_pages_are_counted_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("1.txt"), "no landmarks on this page").unwrap();
    let pipeline = Pipeline::new(Workspace::open(dir.path()).unwrap());

    let summary = pipeline.process_pages(&ProcessOptions::default()).unwrap();
    assert_eq!(summary.pages_seen, 1);
    assert_eq!(summary.pages_skipped, 1);
    assert_eq!(summary.invoices_written, 0);
    assert_eq!(summary.warnings.len(), 1);

    // Nothing to combine afterwards.
    assert!(pipeline.combine(&CombineOptions::default()).is_err());
}

#[test]
fn test_empty_workspace_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(Workspace::open(dir.path()).unwrap());
    assert!(pipeline.process_pages(&ProcessOptions::default()).is_err());
}
