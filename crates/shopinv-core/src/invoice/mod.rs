//! Invoice field extraction module.

pub mod amazon;
pub mod classifier;
mod coordinator;
pub mod flipkart;
pub mod rules;
mod text;

pub use amazon::{AmazonParser, parse_amazon_invoice};
pub use classifier::classify_vendor;
pub use coordinator::{
    BatchDocument, BatchReport, DocumentContent, DocumentReport, ExtractionCoordinator,
};
pub use flipkart::{FlipkartParser, parse_flipkart_invoice};
pub use text::DocumentText;

use crate::models::record::{InvoiceRecord, VendorKind};

/// A vendor-specific rule set.
pub trait InvoiceParser {
    /// Vendor whose layout this parser understands.
    fn vendor(&self) -> VendorKind;

    /// Extract a record from a document's lines. Never fails: fields whose
    /// anchors are missing stay empty.
    fn parse(&self, doc: &DocumentText<'_>) -> InvoiceRecord;
}
