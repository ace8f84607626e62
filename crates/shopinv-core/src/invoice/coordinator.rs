//! Batch coordination: classify, dispatch to a rule set, collect records.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::amazon::AmazonParser;
use super::classifier::classify_vendor;
use super::flipkart::FlipkartParser;
use super::text::DocumentText;
use super::InvoiceParser;
use crate::error::ExtractionError;
use crate::models::config::PdfConfig;
use crate::models::record::{InvoiceRecord, VendorKind};
use crate::models::table::AggregateTable;
use crate::pdf;

/// Content of one input document.
#[derive(Debug, Clone)]
pub enum DocumentContent {
    /// Raw PDF bytes.
    Pdf(Vec<u8>),
    /// Text that was already extracted.
    Text(String),
}

/// One named document of a batch.
#[derive(Debug, Clone)]
pub struct BatchDocument {
    pub name: String,
    pub content: DocumentContent,
}

impl BatchDocument {
    pub fn pdf(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content: DocumentContent::Pdf(data),
        }
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: DocumentContent::Text(text.into()),
        }
    }
}

/// Outcome for a single document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// Document name (usually the file name).
    pub name: String,
    /// Extracted record, `InvoiceRecord::Unknown` for unsupported layouts.
    pub record: InvoiceRecord,
    /// Text extraction failure, if any. The record was built from partial text.
    pub read_error: Option<String>,
    /// Fields that could not be found.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl DocumentReport {
    pub fn vendor(&self) -> VendorKind {
        self.record.vendor()
    }

    /// Whether the document produced a row for the aggregate table.
    pub fn is_supported(&self) -> bool {
        self.vendor().is_supported()
    }
}

/// Per-document results of one batch, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: DocumentReport) {
        self.documents.push(report);
    }

    /// Records of recognized vendors.
    pub fn records(&self) -> impl Iterator<Item = &InvoiceRecord> {
        self.documents
            .iter()
            .filter(|d| d.is_supported())
            .map(|d| &d.record)
    }

    pub fn supported_count(&self) -> usize {
        self.records().count()
    }

    /// Documents of unknown layout.
    pub fn unsupported(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|d| !d.is_supported())
    }

    /// Documents whose text could not be read completely.
    pub fn read_failures(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|d| d.read_error.is_some())
    }

    /// Merge all recognized records into one table.
    ///
    /// Fails with [`ExtractionError::NoValidInvoices`] when there is nothing
    /// to export.
    pub fn aggregate(&self) -> Result<AggregateTable, ExtractionError> {
        let table = AggregateTable::from_records(self.records());
        if table.is_empty() {
            return Err(ExtractionError::NoValidInvoices);
        }
        Ok(table)
    }
}

/// Routes documents to the matching vendor rule set.
pub struct ExtractionCoordinator {
    amazon: AmazonParser,
    flipkart: FlipkartParser,
    pdf: PdfConfig,
}

impl ExtractionCoordinator {
    /// Create a coordinator with default PDF settings.
    pub fn new() -> Self {
        Self {
            amazon: AmazonParser::new(),
            flipkart: FlipkartParser::new(),
            pdf: PdfConfig::default(),
        }
    }

    /// Set PDF text extraction options.
    pub fn with_pdf_config(mut self, config: PdfConfig) -> Self {
        self.pdf = config;
        self
    }

    /// Rule set for `vendor`, if one exists.
    pub fn parser_for(&self, vendor: VendorKind) -> Option<&dyn InvoiceParser> {
        match vendor {
            VendorKind::Amazon => Some(&self.amazon),
            VendorKind::Flipkart => Some(&self.flipkart),
            VendorKind::Unknown => None,
        }
    }

    /// Classify `text` and extract a record with the matching rule set.
    pub fn extract(&self, text: &str) -> InvoiceRecord {
        let vendor = classify_vendor(text);
        debug!("Classified document as {}", vendor);

        match self.parser_for(vendor) {
            Some(parser) => parser.parse(&DocumentText::new(text)),
            None => InvoiceRecord::Unknown,
        }
    }

    /// Process already-extracted text.
    pub fn process_text(&self, name: &str, text: &str) -> DocumentReport {
        let start = Instant::now();
        let record = self.extract(text);
        self.finish(name, record, None, start)
    }

    /// Read a PDF and process whatever text it yields.
    pub fn process_pdf(&self, name: &str, data: &[u8]) -> DocumentReport {
        let start = Instant::now();
        let extraction = pdf::extract_text(data, &self.pdf);
        let read_error = extraction.error.map(|e| e.to_string());

        let record = self.extract(&extraction.text);
        self.finish(name, record, read_error, start)
    }

    /// Process one batch document.
    pub fn process(&self, document: &BatchDocument) -> DocumentReport {
        match &document.content {
            DocumentContent::Pdf(data) => self.process_pdf(&document.name, data),
            DocumentContent::Text(text) => self.process_text(&document.name, text),
        }
    }

    /// Process every document in order. A failing document never stops the batch.
    pub fn run<'a, I>(&self, documents: I) -> BatchReport
    where
        I: IntoIterator<Item = &'a BatchDocument>,
    {
        let mut report = BatchReport::new();
        for document in documents {
            report.push(self.process(document));
        }

        info!(
            "Processed {} documents, {} recognized",
            report.documents.len(),
            report.supported_count()
        );
        report
    }

    fn finish(
        &self,
        name: &str,
        record: InvoiceRecord,
        read_error: Option<String>,
        start: Instant,
    ) -> DocumentReport {
        let warnings = record
            .missing_fields()
            .into_iter()
            .map(|field| format!("Could not extract {}", field))
            .collect();

        if !record.vendor().is_supported() {
            warn!("{}: unsupported format", name);
        }

        DocumentReport {
            name: name.to_string(),
            record,
            read_error,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for ExtractionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::table::AggregateRow;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const AMAZON_TEXT: &str =
        "Sold By :\nAppario Retail\nOrder Number: 171-111 x\nInvoice Value: ₹1,299.00";
    const FLIPKART_TEXT: &str = "Flipkart\nOrder ID: OD42\nGrand Total\n₹ 2,500.00";

    #[test]
    fn test_extract_dispatches_by_vendor() {
        let coordinator = ExtractionCoordinator::new();

        let record = coordinator.extract(AMAZON_TEXT);
        assert_eq!(record.vendor(), VendorKind::Amazon);
        assert_eq!(record.identity().unwrap().order_id, "171-111");

        let record = coordinator.extract(FLIPKART_TEXT);
        assert_eq!(record.vendor(), VendorKind::Flipkart);
        assert_eq!(record.amount(), Some(Decimal::from_str("2500").unwrap()));
    }

    #[test]
    fn test_unknown_vendor_is_excluded() {
        let coordinator = ExtractionCoordinator::new();
        let documents = vec![
            BatchDocument::text("shop.txt", "Corner Shop\nTotal 40.00"),
            BatchDocument::text("a.txt", AMAZON_TEXT),
        ];

        let report = coordinator.run(&documents);
        assert_eq!(report.documents.len(), 2);
        assert_eq!(report.documents[0].record, InvoiceRecord::Unknown);
        assert_eq!(report.unsupported().count(), 1);

        let table = report.aggregate().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].seller, "Appario Retail");
    }

    #[test]
    fn test_aggregate_merges_both_vendors() {
        let coordinator = ExtractionCoordinator::new();
        let documents = vec![
            BatchDocument::text("a.txt", AMAZON_TEXT),
            BatchDocument::text("f.txt", FLIPKART_TEXT),
        ];

        let table = coordinator.run(&documents).aggregate().unwrap();
        let amounts: Vec<Option<Decimal>> =
            table.rows.iter().map(|r: &AggregateRow| r.amount).collect();

        assert_eq!(
            amounts,
            vec![
                Some(Decimal::from_str("1299").unwrap()),
                Some(Decimal::from_str("2500").unwrap()),
            ]
        );
        assert_eq!(table.rows[1].order_id, "OD42");
    }

    #[test]
    fn test_empty_batch_signals_no_valid_invoices() {
        let coordinator = ExtractionCoordinator::new();

        let report = coordinator.run(&Vec::<BatchDocument>::new());
        assert_eq!(report.aggregate(), Err(ExtractionError::NoValidInvoices));

        let documents = vec![BatchDocument::text("x.txt", "nothing to see")];
        let report = coordinator.run(&documents);
        assert_eq!(report.aggregate(), Err(ExtractionError::NoValidInvoices));
    }

    #[test]
    fn test_unreadable_pdf_does_not_stop_batch() {
        let coordinator = ExtractionCoordinator::new();
        let documents = vec![
            BatchDocument::pdf("broken.pdf", b"%PDF-1.4 truncated".to_vec()),
            BatchDocument::text("f.txt", FLIPKART_TEXT),
        ];

        let report = coordinator.run(&documents);

        assert_eq!(report.read_failures().count(), 1);
        assert_eq!(report.documents[0].vendor(), VendorKind::Unknown);
        assert_eq!(report.documents[1].vendor(), VendorKind::Flipkart);
        assert_eq!(report.aggregate().unwrap().len(), 1);
    }

    #[test]
    fn test_pdf_document() {
        let data = crate::pdf::build_pdf(&[&["Sold by Amazon Seller Services"]]);
        let coordinator = ExtractionCoordinator::new();

        let report = coordinator.process(&BatchDocument::pdf("amazon.pdf", data));
        assert!(report.read_error.is_none());
        assert_eq!(report.vendor(), VendorKind::Amazon);
    }

    #[test]
    fn test_missing_fields_become_warnings() {
        let coordinator = ExtractionCoordinator::new();
        let report = coordinator.process_text("f.txt", FLIPKART_TEXT);

        assert_eq!(
            report.warnings,
            vec![
                "Could not extract Order Date".to_string(),
                "Could not extract Invoice Number".to_string(),
                "Could not extract Seller".to_string(),
            ]
        );
    }
}
