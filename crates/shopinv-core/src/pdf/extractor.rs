//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;
use crate::models::config::{PdfConfig, PdfEngine};

/// PDF text extractor backed by lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    decrypt_empty_password: bool,
}

/// Best-effort text of one document.
///
/// `text` holds everything read before `error` occurred, possibly nothing.
#[derive(Debug, Default)]
pub struct TextExtraction {
    pub text: String,
    pub pages_read: u32,
    pub error: Option<PdfError>,
}

impl TextExtraction {
    fn failed(error: PdfError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            decrypt_empty_password: true,
        }
    }

    /// Whether to retry encrypted documents with an empty password.
    pub fn with_empty_password_decryption(mut self, enabled: bool) -> Self {
        self.decrypt_empty_password = enabled;
        self
    }

    /// Read pages in order, appending a newline after each one.
    ///
    /// Stops at the first page that fails and keeps what was read so far.
    pub fn extract_pages(&self, max_pages: usize) -> TextExtraction {
        let doc = match self.document.as_ref() {
            Some(d) => d,
            None => {
                return TextExtraction::failed(PdfError::Parse("No document loaded".to_string()));
            }
        };

        let limit = if max_pages == 0 { usize::MAX } else { max_pages };
        let pages = doc.get_pages().into_keys().take(limit);
        let result = read_pages(pages, |page| self.extract_page_text(page));

        debug!(
            "Read {} pages, {} chars of text",
            result.pages_read,
            result.text.len()
        );
        result
    }
}

/// Concatenate page texts in order, one newline after each page.
///
/// Stops at the first page that fails and keeps what was read so far.
fn read_pages<I, F>(pages: I, mut read: F) -> TextExtraction
where
    I: IntoIterator<Item = u32>,
    F: FnMut(u32) -> Result<String>,
{
    let mut result = TextExtraction::default();

    for page in pages {
        match read(page) {
            Ok(page_text) => {
                result.text.push_str(&page_text);
                result.text.push('\n');
                result.pages_read += 1;
            }
            Err(e) => {
                warn!("Stopping at page {}: {}", page, e);
                result.error = Some(e);
                break;
            }
        }
    }

    result
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        if doc.is_encrypted() {
            if !self.decrypt_empty_password || doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self
            .document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))?;

        if !doc.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }

        doc.extract_text(&[page]).map_err(|e| PdfError::PageText {
            page,
            reason: e.to_string(),
        })
    }
}

/// Pull text out of a PDF without failing.
///
/// Load and extraction errors are returned alongside whatever text was read.
pub fn extract_text(data: &[u8], config: &PdfConfig) -> TextExtraction {
    let mut extractor =
        PdfExtractor::new().with_empty_password_decryption(config.decrypt_empty_password);

    if let Err(e) = extractor.load(data) {
        warn!("PDF reading error: {}", e);
        return TextExtraction::failed(e);
    }

    match config.engine {
        PdfEngine::Lopdf => extractor.extract_pages(config.max_pages),
        PdfEngine::PdfExtract => match extractor.extract_text() {
            Ok(text) => TextExtraction {
                text,
                pages_read: extractor.page_count(),
                error: None,
            },
            Err(e) => {
                warn!("PDF reading error: {}", e);
                TextExtraction::failed(e)
            }
        },
    }
}
