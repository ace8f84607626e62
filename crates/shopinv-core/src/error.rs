//! Error types for the shopinv-core library.

use thiserror::Error;

/// Main error type for the shopinv library.
#[derive(Error, Debug)]
pub enum ShopinvError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from the whole document.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to extract text from a single page.
    #[error("failed to extract text from page {page}: {reason}")]
    PageText { page: u32, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to batch extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No document in the batch came from a recognized vendor.
    #[error("no valid invoices found")]
    NoValidInvoices,
}

/// Errors raised while writing the aggregate table.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Spreadsheet writer failure.
    #[error("xlsx: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// CSV writer failure.
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Buffer flush failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the shopinv library.
pub type Result<T> = std::result::Result<T, ShopinvError>;
