//! The 28-column output schema and row rendering.
//!
//! [`Column`] is the only definition of the layout: the header writer and
//! every record writer consult it, so no positional index appears anywhere
//! else. Most columns stay blank at emission time; the reconciler fills
//! several of them later.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::invoice::ResolvedTotals;
use crate::row::ParsedRow;

/// Number of columns in the output schema (A through AB).
pub const COLUMN_COUNT: usize = 28;

/// One column of the output schema, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    RtsId,
    RtsStatus,
    LoadNumber,
    WaveNumber,
    RoutedDate,
    ReadyDate,
    DateOfPickup,
    TimeOfPickup,
    OutboundBol,
    OrderDate,
    Customer,
    ShipToName,
    PurchaseOrderNo,
    Cartons,
    StartDate,
    CancelDate,
    BolCube,
    FinalCube,
    BurlingtonCube,
    Pallet,
    IndividualPieces,
    TotalPieces,
    IndividualWeight,
    TotalWeight,
    InvoiceNo,
    Style,
    Release,
    AssignedTruckingCo,
}

impl Column {
    /// Every column in schema order.
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::RtsId,
        Column::RtsStatus,
        Column::LoadNumber,
        Column::WaveNumber,
        Column::RoutedDate,
        Column::ReadyDate,
        Column::DateOfPickup,
        Column::TimeOfPickup,
        Column::OutboundBol,
        Column::OrderDate,
        Column::Customer,
        Column::ShipToName,
        Column::PurchaseOrderNo,
        Column::Cartons,
        Column::StartDate,
        Column::CancelDate,
        Column::BolCube,
        Column::FinalCube,
        Column::BurlingtonCube,
        Column::Pallet,
        Column::IndividualPieces,
        Column::TotalPieces,
        Column::IndividualWeight,
        Column::TotalWeight,
        Column::InvoiceNo,
        Column::Style,
        Column::Release,
        Column::AssignedTruckingCo,
    ];

    /// The column's header name.
    pub fn name(self) -> &'static str {
        match self {
            Column::RtsId => "RTS ID",
            Column::RtsStatus => "RTS Status",
            Column::LoadNumber => "Load #",
            Column::WaveNumber => "Wave #",
            Column::RoutedDate => "Routed Date",
            Column::ReadyDate => "Ready Date",
            Column::DateOfPickup => "Date of Pickup",
            Column::TimeOfPickup => "Time of Pickup",
            Column::OutboundBol => "Outbound BOL",
            Column::OrderDate => "Order Date",
            Column::Customer => "Customer",
            Column::ShipToName => "Ship To Name",
            Column::PurchaseOrderNo => "Purchase Order No.",
            Column::Cartons => "Cartons",
            Column::StartDate => "Start Date",
            Column::CancelDate => "Cancel Date",
            Column::BolCube => "BOL Cube",
            Column::FinalCube => "Final Cube",
            Column::BurlingtonCube => "Burlington Cube",
            Column::Pallet => "Pallet",
            Column::IndividualPieces => "Individual Pieces",
            Column::TotalPieces => "Total Pieces",
            Column::IndividualWeight => "Individual Weight",
            Column::TotalWeight => "Total Weight",
            Column::InvoiceNo => "Invoice No.",
            Column::Style => "Style",
            Column::Release => "Release",
            Column::AssignedTruckingCo => "Assigned Trucking Co.",
        }
    }

    /// The column's position in the schema.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a column by its header name.
    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// The fixed header record.
    pub fn header() -> [&'static str; COLUMN_COUNT] {
        Column::ALL.map(Column::name)
    }
}

/// One row of the output schema with only its populated fields named.
///
/// Rendering to a full 28-cell record goes through [`Column`], so the
/// field-to-position mapping lives in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputRow {
    /// Carton count.
    pub cartons: String,
    /// BOL cube shared by all rows of the invoice.
    pub bol_cube: String,
    /// Piece count for this row.
    pub individual_pieces: String,
    /// Weight for this row.
    pub individual_weight: String,
    /// Invoice number this row belongs to.
    pub invoice_no: String,
    /// Style code.
    pub style: String,
    /// Invoice total pieces; populated only on the first row of an
    /// invoice group.
    pub total_pieces: Option<String>,
    /// Invoice total weight; populated only on the first row of an
    /// invoice group.
    pub total_weight: Option<String>,
}

impl OutputRow {
    /// Build a row from a parsed shipment line, without totals.
    pub fn from_parsed(invoice_no: &str, bol_cube: &str, parsed: &ParsedRow) -> Self {
        Self {
            cartons: parsed.cartons.clone(),
            bol_cube: bol_cube.to_string(),
            individual_pieces: parsed.individual_pieces.clone(),
            individual_weight: parsed.individual_weight.clone(),
            invoice_no: invoice_no.to_string(),
            style: parsed.style.clone(),
            total_pieces: None,
            total_weight: None,
        }
    }

    /// Render the full 28-cell record. Unpopulated columns are empty
    /// strings.
    pub fn to_record(&self) -> Vec<String> {
        let mut record = vec![String::new(); COLUMN_COUNT];
        record[Column::Cartons.index()] = self.cartons.clone();
        record[Column::BolCube.index()] = self.bol_cube.clone();
        record[Column::IndividualPieces.index()] = self.individual_pieces.clone();
        record[Column::IndividualWeight.index()] = self.individual_weight.clone();
        record[Column::InvoiceNo.index()] = self.invoice_no.clone();
        record[Column::Style.index()] = self.style.clone();
        if let Some(ref pieces) = self.total_pieces {
            record[Column::TotalPieces.index()] = pieces.clone();
        }
        if let Some(ref weight) = self.total_weight {
            record[Column::TotalWeight.index()] = weight.clone();
        }
        record
    }
}

/// Split a sequence into contiguous runs of items sharing a key.
///
/// Returns the index range of each run in order. The sequence must already
/// be ordered so that equal-keyed items are adjacent; this function does
/// not sort.
pub fn runs_by<T, K: PartialEq>(items: &[T], key: impl Fn(&T) -> K) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;

    for i in 1..items.len() {
        if key(&items[i]) != key(&items[i - 1]) {
            runs.push(start..i);
            start = i;
        }
    }
    if !items.is_empty() {
        runs.push(start..items.len());
    }
    runs
}

/// Place resolved totals on the first row of each invoice run.
///
/// Rows must already be ordered with same-invoice rows adjacent. Rows other
/// than the head of a run keep their totals blank.
pub fn place_totals(rows: &mut [OutputRow], totals: &BTreeMap<String, ResolvedTotals>) {
    for run in runs_by(rows, |r| r.invoice_no.clone()) {
        let head = run.start;
        if let Some(resolved) = totals.get(&rows[head].invoice_no) {
            rows[head].total_pieces = Some(resolved.pieces.clone());
            rows[head].total_weight = Some(resolved.weight.clone());
        }
    }
}
