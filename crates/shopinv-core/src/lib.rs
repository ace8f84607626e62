//! Core library for Amazon/Flipkart invoice extraction.
//!
//! This crate provides:
//! - PDF text extraction (lopdf page by page, or pdf-extract)
//! - Vendor classification and per-vendor anchor rules
//! - Batch coordination and merging into one export table
//! - xlsx/csv/json export of the merged table

pub mod error;
pub mod export;
pub mod invoice;
pub mod models;
pub mod pdf;

pub use error::{ExportError, ExtractionError, PdfError, Result, ShopinvError};
pub use export::{EXPORT_FILE_NAME, EXPORT_MIME_TYPE, ExportArtifact, ExportFormat};
pub use invoice::{
    BatchDocument, BatchReport, DocumentReport, DocumentText, ExtractionCoordinator, InvoiceParser,
    classify_vendor,
};
pub use models::config::ShopinvConfig;
pub use models::record::{
    AmazonInvoice, FlipkartInvoice, InvoiceIdentity, InvoiceRecord, VendorKind,
};
pub use models::table::{AggregateRow, AggregateTable};
pub use pdf::{PdfExtractor, PdfProcessor, TextExtraction};
