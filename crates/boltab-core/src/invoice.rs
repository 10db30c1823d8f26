//! Multi-page invoice aggregation and totals resolution.
//!
//! A single invoice may span several PDF pages, and the authoritative
//! totals line may appear on any one of them. Pages are collected per
//! invoice in arrival order; totals are resolved afterwards.

use std::collections::BTreeMap;

use crate::error::{ScanResult, ScanWarning, ScanWarningCode};
use crate::page::{PageExtraction, PageParser};

/// All pages collected for one invoice number, in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvoiceRecord {
    /// Page extractions in page-arrival order.
    pub pages: Vec<PageExtraction>,
}

/// Totals resolved for a whole invoice, plus the BOL cube that applies to
/// all of its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedTotals {
    /// Total piece count for the invoice.
    pub pieces: String,
    /// Total weight for the invoice.
    pub weight: String,
    /// BOL cube shared by every row of the invoice.
    pub bol_cube: String,
}

impl InvoiceRecord {
    /// Whether any collected page carried a totals line.
    pub fn has_totals(&self) -> bool {
        self.pages.iter().any(|p| p.has_totals)
    }

    /// Number of data rows across all pages.
    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|p| p.rows.len()).sum()
    }

    /// Resolve the invoice's totals and BOL cube.
    ///
    /// Scans pages in reverse arrival order and takes the first page whose
    /// totals line produced both a pieces and a weight value; that page also
    /// supplies the BOL cube. When no page qualifies, totals are computed by
    /// summing the individual rows (cells that fail to parse contribute
    /// nothing) and the BOL cube comes from the first page with a non-empty
    /// value.
    pub fn resolve_totals(&self) -> ResolvedTotals {
        for page in self.pages.iter().rev() {
            if page.has_totals && !page.totals.pieces.is_empty() && !page.totals.weight.is_empty()
            {
                return ResolvedTotals {
                    pieces: page.totals.pieces.clone(),
                    weight: page.totals.weight.clone(),
                    bol_cube: page.bol_cube.clone(),
                };
            }
        }

        let mut pieces: i64 = 0;
        let mut weight: f64 = 0.0;
        for row in self.pages.iter().flat_map(|p| &p.rows) {
            if let Ok(v) = row.individual_pieces.parse::<i64>() {
                pieces += v;
            }
            if let Ok(v) = row.individual_weight.parse::<f64>() {
                weight += v;
            }
        }

        let bol_cube = self
            .pages
            .iter()
            .map(|p| p.bol_cube.as_str())
            .find(|c| !c.is_empty())
            .unwrap_or("")
            .to_string();

        ResolvedTotals {
            pieces: pieces.to_string(),
            weight: format_weight(weight),
            bol_cube,
        }
    }
}

/// Format a summed weight, keeping decimal precision but rendering whole
/// values without a fractional part.
fn format_weight(total: f64) -> String {
    if total.fract() == 0.0 {
        format!("{}", total as i64)
    } else {
        total.to_string()
    }
}

/// Groups per-page parse results by invoice number.
///
/// Pages without an invoice number or a table header are skipped with a
/// warning; the batch continues. Call [`finish`](Aggregator::finish) to get
/// the collected invoices plus all warnings.
#[derive(Debug)]
pub struct Aggregator {
    parser: PageParser,
    invoices: BTreeMap<String, InvoiceRecord>,
    warnings: Vec<ScanWarning>,
    pages_seen: usize,
    pages_skipped: usize,
}

impl Aggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self {
            parser: PageParser::new(),
            invoices: BTreeMap::new(),
            warnings: Vec::new(),
            pages_seen: 0,
            pages_skipped: 0,
        }
    }

    /// Parse one page of text and file it under its invoice number.
    ///
    /// `page_number` is 1-indexed and used only for warning context.
    pub fn add_page(&mut self, page_number: usize, text: &str) {
        self.pages_seen += 1;

        let invoice_no = self.parser.invoice_no(text);
        if invoice_no.is_empty() {
            self.pages_skipped += 1;
            self.warnings.push(ScanWarning::on_page(
                ScanWarningCode::MissingInvoiceNumber,
                "no invoice number found in leading lines",
                page_number,
            ));
            return;
        }

        let Some(extraction) = self.parser.parse(text) else {
            self.pages_skipped += 1;
            self.warnings.push(ScanWarning::with_context(
                ScanWarningCode::MissingTableHeader,
                "table header not found",
                page_number,
                invoice_no,
            ));
            return;
        };

        self.invoices
            .entry(invoice_no)
            .or_default()
            .pages
            .push(extraction);
    }

    /// Number of pages fed to the aggregator.
    pub fn pages_seen(&self) -> usize {
        self.pages_seen
    }

    /// Number of pages skipped for missing invoice number or table header.
    pub fn pages_skipped(&self) -> usize {
        self.pages_skipped
    }

    /// Consume the aggregator, dropping invoices with no extractable rows.
    ///
    /// An empty invoice produces a warning rather than failing the run.
    pub fn finish(mut self) -> ScanResult<BTreeMap<String, InvoiceRecord>> {
        let empty: Vec<String> = self
            .invoices
            .iter()
            .filter(|(_, record)| record.row_count() == 0)
            .map(|(invoice_no, _)| invoice_no.clone())
            .collect();

        for invoice_no in empty {
            self.invoices.remove(&invoice_no);
            self.warnings.push(ScanWarning::for_invoice(
                ScanWarningCode::EmptyInvoice,
                "no rows extracted across any page",
                invoice_no,
            ));
        }

        ScanResult::with_warnings(self.invoices, self.warnings)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageTotals;
    use crate::row::ParsedRow;

    fn row(pieces: &str, weight: &str) -> ParsedRow {
        ParsedRow {
            cartons: "1".to_string(),
            style: "AB1".to_string(),
            individual_pieces: pieces.to_string(),
            individual_weight: weight.to_string(),
        }
    }

    fn page(rows: Vec<ParsedRow>, totals: Option<(&str, &str)>, bol_cube: &str) -> PageExtraction {
        PageExtraction {
            rows,
            has_totals: totals.is_some(),
            totals: totals
                .map(|(pieces, weight)| PageTotals {
                    pieces: pieces.to_string(),
                    weight: weight.to_string(),
                })
                .unwrap_or_default(),
            bol_cube: bol_cube.to_string(),
        }
    }

    #[test]
    fn test_totals_from_last_qualifying_page() {
        let record = InvoiceRecord {
            pages: vec![
                page(vec![row("5", "1.5")], None, "100.00"),
                page(vec![row("10", "2.5")], Some(("10", "20")), "161.00"),
                page(vec![row("15", "3.5")], None, "200.00"),
            ],
        };
        let resolved = record.resolve_totals();
        assert_eq!(resolved.pieces, "10");
        assert_eq!(resolved.weight, "20");
        // The qualifying page's cube, not the first or last page's.
        assert_eq!(resolved.bol_cube, "161.00");
    }

    #[test]
    fn test_totals_line_with_empty_values_does_not_qualify() {
        let record = InvoiceRecord {
            pages: vec![
                page(vec![row("5", "1.5")], Some(("30", "40")), "100.00"),
                // has_totals but values were not extracted (short line).
                page(vec![row("10", "2.5")], Some(("", "")), "161.00"),
            ],
        };
        let resolved = record.resolve_totals();
        assert_eq!(resolved.pieces, "30");
        assert_eq!(resolved.weight, "40");
        assert_eq!(resolved.bol_cube, "100.00");
    }

    #[test]
    fn test_fallback_summation() {
        let record = InvoiceRecord {
            pages: vec![
                page(vec![row("5", "1.25"), row("10", "2.25")], None, ""),
                page(vec![row("15", "3.5")], None, "88.00"),
            ],
        };
        let resolved = record.resolve_totals();
        assert_eq!(resolved.pieces, "30");
        assert_eq!(resolved.weight, "7");
        // First page with a non-empty cube.
        assert_eq!(resolved.bol_cube, "88.00");
    }

    #[test]
    fn test_fallback_keeps_fractional_weight() {
        let record = InvoiceRecord {
            pages: vec![page(vec![row("5", "1.25"), row("10", "2.5")], None, "")],
        };
        assert_eq!(record.resolve_totals().weight, "3.75");
    }

    #[test]
    fn test_fallback_skips_unparseable_cells() {
        let record = InvoiceRecord {
            pages: vec![page(vec![row("5", "1.5"), row("", "junk")], None, "")],
        };
        let resolved = record.resolve_totals();
        assert_eq!(resolved.pieces, "5");
        assert_eq!(resolved.weight, "1.5");
    }

    #[test]
    fn test_aggregator_groups_pages_by_invoice() {
        let mut agg = Aggregator::new();
        agg.add_page(
            1,
            "BILL OF LADING G11111\nCARTONS STYLE PIECES\n30 AB123 720 200.0",
        );
        agg.add_page(
            2,
            "BILL OF LADING G11111\nCARTONS STYLE PIECES\n12 CD456 480 130.5",
        );
        agg.add_page(
            3,
            "BILL OF LADING G22222\nCARTONS STYLE PIECES\n7 EF789 140 55.0",
        );

        let result = agg.finish();
        assert!(result.is_clean());
        assert_eq!(result.value.len(), 2);
        assert_eq!(result.value["G11111"].pages.len(), 2);
        assert_eq!(result.value["G11111"].row_count(), 2);
        assert_eq!(result.value["G22222"].row_count(), 1);
    }

    #[test]
    fn test_aggregator_skips_page_without_invoice() {
        let mut agg = Aggregator::new();
        agg.add_page(1, "no landmarks at all");
        assert_eq!(agg.pages_seen(), 1);
        assert_eq!(agg.pages_skipped(), 1);

        let result = agg.finish();
        assert!(result.value.is_empty());
        assert_eq!(
            result.warnings[0].code,
            ScanWarningCode::MissingInvoiceNumber
        );
    }

    #[test]
    fn test_aggregator_drops_empty_invoice_with_warning() {
        let mut agg = Aggregator::new();
        // Header present but no parseable row beneath it.
        agg.add_page(1, "BILL OF LADING G33333\nCARTONS STYLE PIECES\nnothing here");
        let result = agg.finish();
        assert!(result.value.is_empty());
        assert_eq!(result.warnings[0].code, ScanWarningCode::EmptyInvoice);
        assert_eq!(result.warnings[0].invoice.as_deref(), Some("G33333"));
    }
}
