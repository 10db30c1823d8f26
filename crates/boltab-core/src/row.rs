//! Shipment row classification and field extraction.
//!
//! Page text arrives as whitespace-tokenized lines with no reliable column
//! alignment, so rows are recognized by content pattern: leading carton
//! counts, style codes, and a trailing weight token.

use regex::Regex;

/// One shipment line recovered from a page's table region.
///
/// Values are kept as comma-stripped strings; numeric interpretation only
/// happens where totals are summed or derived fields are computed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedRow {
    /// Carton count for this line.
    pub cartons: String,
    /// Style code (e.g. `AB123`).
    pub style: String,
    /// Piece count for this line.
    pub individual_pieces: String,
    /// Weight for this line, taken from the last decimal-looking token.
    pub individual_weight: String,
}

/// Classifies table-region lines and extracts typed fields from data rows.
///
/// Patterns are compiled once; one classifier is reused across all lines of
/// a page (and across pages).
#[derive(Debug)]
pub struct RowClassifier {
    skip_patterns: Vec<Regex>,
    leading_digit: Regex,
    number: Regex,
    style_token: Vec<Regex>,
    decimal: Regex,
}

impl RowClassifier {
    /// Create a classifier with the standard BOL table patterns.
    pub fn new() -> Self {
        let skip_patterns = [
            r"(?i)^CARTONS.*STYLE.*PIECES",
            r"(?i)^SHIPPING INSTRUCTIONS",
            r"(?i)^TOTAL CARTONS",
            r"(?i)^Page \d+",
            r"(?i)^BILL OF LADING",
            r"^[A-Za-z\s]+:",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect();

        Self {
            skip_patterns,
            leading_digit: Regex::new(r"^\d+").unwrap(),
            number: Regex::new(r"\d+").unwrap(),
            style_token: vec![
                Regex::new(r"\b[A-Z]+\d+\b").unwrap(),
                Regex::new(r"\b\d+[A-Z]+\b").unwrap(),
            ],
            decimal: Regex::new(r"^\d+\.?\d*$").unwrap(),
        }
    }

    /// Returns whether a line qualifies as a data row.
    ///
    /// A line qualifies if it survives the known non-data patterns and then
    /// matches any of:
    /// 1. starts with a digit, or
    /// 2. contains at least 3 numeric tokens, or
    /// 3. contains a style-like token (letters-then-digits or
    ///    digits-then-letters) and has at least 3 whitespace-separated
    ///    tokens, one of which starts with a digit.
    pub fn is_data_row(&self, line: &str) -> bool {
        // Collapse runs of whitespace so the anchored skip patterns see the
        // same shape regardless of source formatting.
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            return false;
        }

        if self.skip_patterns.iter().any(|p| p.is_match(&line)) {
            return false;
        }

        if self.leading_digit.is_match(&line) {
            return true;
        }

        if self.number.find_iter(&line).count() >= 3 {
            return true;
        }

        if self.style_token.iter().any(|p| p.is_match(&line)) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() >= 3 && tokens.iter().any(|t| self.leading_digit.is_match(t)) {
                return true;
            }
        }

        false
    }

    /// Extract a [`ParsedRow`] from a qualifying line.
    ///
    /// Tokenizes on whitespace: `cartons` is the first token, `style` the
    /// second, `individual_pieces` the third (commas stripped from numeric
    /// fields). The weight is the last token that fully matches a decimal
    /// number pattern, scanning from the end. Returns `None` for lines with
    /// fewer than 3 tokens or no weight token — a malformed row is dropped,
    /// never emitted partially.
    pub fn parse_row(&self, line: &str) -> Option<ParsedRow> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return None;
        }

        let cartons = tokens[0].replace(',', "");
        let style = tokens[1].to_string();
        let individual_pieces = tokens[2].replace(',', "");

        let individual_weight = tokens.iter().rev().find_map(|t| {
            let stripped = t.replace(',', "");
            self.decimal.is_match(&stripped).then_some(stripped)
        })?;

        Some(ParsedRow {
            cartons,
            style,
            individual_pieces,
            individual_weight,
        })
    }
}

impl Default for RowClassifier {
    fn default() -> Self {
        Self::new()
    }
}
