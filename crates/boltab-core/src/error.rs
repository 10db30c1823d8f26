//! Error and warning types for boltab.
//!
//! Provides [`BolError`] for fatal errors that abort an operation,
//! [`ScanWarning`] for non-fatal issues that allow best-effort continuation,
//! and [`ScanResult`] for pairing a value with collected warnings.

use std::fmt;

/// Which side of a reconciliation a column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSide {
    /// The combined dataset produced from parsed shipment pages.
    Combined,
    /// The externally supplied order dataset.
    Incoming,
}

impl TableSide {
    /// Returns the human-readable name of this side.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableSide::Combined => "combined dataset",
            TableSide::Incoming => "incoming file",
        }
    }
}

/// Fatal error types for shipment data processing.
///
/// These errors indicate conditions that abort the current operation.
/// Prior state on disk is left untouched by the failing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum BolError {
    /// I/O error reading or writing workspace files.
    IoError(String),
    /// A required column is missing from one side of a reconciliation.
    MissingColumn {
        /// Name of the missing column.
        column: String,
        /// Which dataset the column was expected in.
        table: TableSide,
    },
    /// The uploaded file has an extension the reconciler cannot read.
    UnsupportedExtension(String),
    /// An input (workspace, file, or dataset) contained nothing to process.
    EmptyInput(String),
    /// Input data could not be interpreted as tabular records.
    MalformedInput(String),
}

impl fmt::Display for BolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BolError::IoError(msg) => write!(f, "I/O error: {msg}"),
            BolError::MissingColumn { column, table } => {
                write!(f, "column '{column}' not found in {}", table.as_str())
            }
            BolError::UnsupportedExtension(ext) => {
                write!(f, "unsupported file extension: {ext}")
            }
            BolError::EmptyInput(msg) => write!(f, "empty input: {msg}"),
            BolError::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
        }
    }
}

impl std::error::Error for BolError {}

impl From<std::io::Error> for BolError {
    fn from(err: std::io::Error) -> Self {
        BolError::IoError(err.to_string())
    }
}

/// Machine-readable warning code for categorizing scan issues.
///
/// Each variant represents a specific category of non-fatal issue that
/// can occur while recovering tabular data from page text. Use
/// [`Other`](ScanWarningCode::Other) for custom or uncategorized warnings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ScanWarningCode {
    /// No table header line was found on a page.
    MissingTableHeader,
    /// No invoice number was found in the page's leading lines.
    MissingInvoiceNumber,
    /// A line in the table region could not be parsed into a row.
    MalformedRow,
    /// An invoice yielded no extractable rows across all of its pages.
    EmptyInvoice,
    /// A cell value could not be interpreted numerically.
    UnparseableValue,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl ScanWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ScanWarningCode::MissingTableHeader => "MISSING_TABLE_HEADER",
            ScanWarningCode::MissingInvoiceNumber => "MISSING_INVOICE_NUMBER",
            ScanWarningCode::MalformedRow => "MALFORMED_ROW",
            ScanWarningCode::EmptyInvoice => "EMPTY_INVOICE",
            ScanWarningCode::UnparseableValue => "UNPARSEABLE_VALUE",
            ScanWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ScanWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered while scanning page text.
///
/// Warnings allow best-effort continuation when issues are encountered
/// (e.g., a page without a table header, a line with no weight token).
/// They include a structured [`code`](ScanWarning::code), a human-readable
/// description, and optional source context: the page number and the
/// invoice number the issue belongs to.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanWarning {
    /// Machine-readable warning code.
    pub code: ScanWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Page number where the warning occurred (1-indexed), if applicable.
    pub page: Option<usize>,
    /// Invoice number associated with the warning, if known.
    pub invoice: Option<String>,
}

impl ScanWarning {
    /// Create a warning with just a description.
    ///
    /// Uses [`ScanWarningCode::Other`] as the default code.
    pub fn new(description: impl Into<String>) -> Self {
        let desc = description.into();
        Self {
            code: ScanWarningCode::Other(desc.clone()),
            description: desc,
            page: None,
            invoice: None,
        }
    }

    /// Create a warning with a specific code and description.
    pub fn with_code(code: ScanWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            invoice: None,
        }
    }

    /// Create a warning with page context.
    pub fn on_page(code: ScanWarningCode, description: impl Into<String>, page: usize) -> Self {
        Self {
            code,
            description: description.into(),
            page: Some(page),
            invoice: None,
        }
    }

    /// Create a warning with both page and invoice context.
    pub fn with_context(
        code: ScanWarningCode,
        description: impl Into<String>,
        page: usize,
        invoice: impl Into<String>,
    ) -> Self {
        Self {
            code,
            description: description.into(),
            page: Some(page),
            invoice: Some(invoice.into()),
        }
    }

    /// Create a warning with invoice context.
    pub fn for_invoice(
        code: ScanWarningCode,
        description: impl Into<String>,
        invoice: impl Into<String>,
    ) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            invoice: Some(invoice.into()),
        }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(ref invoice) = self.invoice {
            write!(f, " [invoice {invoice}]")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
///
/// Used when an operation can partially succeed: skipped pages, dropped
/// rows, and empty invoices are absorbed at the lowest applicable
/// granularity and surfaced here instead of failing the run.
#[derive(Debug, Clone)]
pub struct ScanResult<T> {
    /// The produced value.
    pub value: T,
    /// Warnings collected while producing the value.
    pub warnings: Vec<ScanWarning>,
}

impl<T> ScanResult<T> {
    /// Create a result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ScanWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value while preserving warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ScanResult<U> {
        ScanResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
