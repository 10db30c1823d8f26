//! Per-page table recovery from extracted PDF text.
//!
//! A page's table region starts at the first line containing the CARTONS /
//! STYLE / PIECES header keywords and ends at a totals line or the shipping
//! instructions marker. The invoice number and BOL cube are recovered from
//! fixed landmarks outside the table region.

use regex::Regex;

use crate::row::{ParsedRow, RowClassifier};

/// Summary totals recovered from a page's "TOTAL CARTONS" line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageTotals {
    /// Total piece count, commas stripped. Empty when not recovered.
    pub pieces: String,
    /// Total weight, commas stripped. Empty when not recovered.
    pub weight: String,
}

/// Parse result for one page of extracted text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageExtraction {
    /// Data rows in encounter order.
    pub rows: Vec<ParsedRow>,
    /// Whether a "TOTAL CARTONS" line terminated the table region.
    pub has_totals: bool,
    /// Totals extracted from that line; may be empty even when
    /// `has_totals` is true (short totals line).
    pub totals: PageTotals,
    /// Decimal cube token found above the shipping instructions marker.
    /// Empty when not found.
    pub bol_cube: String,
}

/// Scans page text for the table region, invoice number, and BOL cube.
///
/// Patterns are compiled once; one parser is reused across all pages of a
/// document.
#[derive(Debug)]
pub struct PageParser {
    classifier: RowClassifier,
    invoice_pattern: Regex,
    cube_pattern: Regex,
}

/// Number of leading lines searched for the "BILL OF LADING" header.
const INVOICE_SCAN_LINES: usize = 10;

/// Minimum token count for a totals line to carry extractable values.
const TOTALS_MIN_TOKENS: usize = 11;

impl PageParser {
    /// Create a parser with the standard BOL landmarks.
    pub fn new() -> Self {
        Self {
            classifier: RowClassifier::new(),
            invoice_pattern: Regex::new(r"(?i)BILL OF LADING\s+([A-Z]\d+)").unwrap(),
            cube_pattern: Regex::new(r"\b\d{1,3}\.\d{2}\b").unwrap(),
        }
    }

    /// Recover the table region of one page.
    ///
    /// Returns `None` when no header line contains all of CARTONS, STYLE,
    /// and PIECES (case-insensitive) — a recoverable per-page condition.
    ///
    /// Lines after the header are classified in order:
    /// - a "TOTAL CARTONS" line marks `has_totals`, yields `totals` when it
    ///   has at least 11 tokens (pieces from the 4th, weight from the last,
    ///   commas stripped), and ends the region;
    /// - a "SHIPPING INSTRUCTIONS:" line ends the region without totals;
    /// - anything else goes through row classification, and malformed rows
    ///   are dropped.
    pub fn parse(&self, text: &str) -> Option<PageExtraction> {
        let lines: Vec<&str> = text.lines().collect();

        let header = lines.iter().position(|line| {
            let upper = line.to_uppercase();
            upper.contains("CARTONS") && upper.contains("STYLE") && upper.contains("PIECES")
        })?;

        let mut rows = Vec::new();
        let mut has_totals = false;
        let mut totals = PageTotals::default();

        for line in &lines[header + 1..] {
            let upper = line.to_uppercase();

            if upper.contains("TOTAL CARTONS") {
                has_totals = true;
                // Expected shape: "30 TOTAL CARTONS 2,160 TOTAL PIECES TOTAL VOL / WGT 595.2"
                let tokens: Vec<&str> = line.split_whitespace().collect();
                if tokens.len() >= TOTALS_MIN_TOKENS {
                    totals.pieces = tokens[3].replace(',', "");
                    totals.weight = tokens[tokens.len() - 1].replace(',', "");
                }
                break;
            }

            if upper.contains("SHIPPING INSTRUCTIONS:") {
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if self.classifier.is_data_row(trimmed) {
                if let Some(row) = self.classifier.parse_row(trimmed) {
                    rows.push(row);
                }
            }
        }

        Some(PageExtraction {
            rows,
            has_totals,
            totals,
            bol_cube: self.bol_cube(text),
        })
    }

    /// Extract the invoice number from a page's leading lines.
    ///
    /// Scans the first 10 lines for "BILL OF LADING" and captures the
    /// letter-plus-digits identifier that follows it. Returns an empty
    /// string when not found; such pages are skipped by aggregation.
    pub fn invoice_no(&self, text: &str) -> String {
        for line in text.lines().take(INVOICE_SCAN_LINES) {
            if line.to_uppercase().contains("BILL OF LADING") {
                if let Some(caps) = self.invoice_pattern.captures(line) {
                    return caps[1].to_string();
                }
            }
        }
        String::new()
    }

    /// Extract the BOL cube value for a page.
    ///
    /// Scans backward from the first "SHIPPING INSTRUCTIONS:" line for a
    /// token shaped like `\d{1,3}.\d{2}`. Returns an empty string when the
    /// marker or the token is absent.
    pub fn bol_cube(&self, text: &str) -> String {
        let lines: Vec<&str> = text.lines().collect();

        let Some(marker) = lines
            .iter()
            .position(|line| line.to_uppercase().contains("SHIPPING INSTRUCTIONS:"))
        else {
            return String::new();
        };

        for line in lines[..marker].iter().rev() {
            if let Some(m) = self.cube_pattern.find(line.trim()) {
                return m.as_str().to_string();
            }
        }
        String::new()
    }
}

impl Default for PageParser {
    fn default() -> Self {
        Self::new()
    }
}
