//! Configuration structures for the extraction pipeline.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShopinvError};
use crate::export::{EXPORT_FILE_NAME, ExportFormat};

/// Main configuration for the shopinv pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopinvConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Export configuration.
    pub export: ExportConfig,
}

/// Backend used to pull text out of a PDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdfEngine {
    /// lopdf, page by page. Keeps the pages read before a failure.
    #[default]
    Lopdf,
    /// pdf-extract over the whole document.
    PdfExtract,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Text extraction backend.
    pub engine: PdfEngine,

    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Try an empty password on encrypted documents.
    pub decrypt_empty_password: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            engine: PdfEngine::Lopdf,
            max_pages: 0,
            decrypt_empty_password: true,
        }
    }
}

/// Aggregate export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output format of the batch export.
    pub format: ExportFormat,

    /// File name of the spreadsheet export.
    pub file_name: String,

    /// Worksheet name.
    pub sheet_name: String,

    /// Number format applied to the amount column.
    pub amount_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Xlsx,
            file_name: EXPORT_FILE_NAME.to_string(),
            sheet_name: "Invoices".to_string(),
            amount_format: "#,##0.00".to_string(),
        }
    }
}

impl ShopinvConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ShopinvError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ShopinvError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ShopinvConfig =
            serde_json::from_str(r#"{ "pdf": { "engine": "pdf_extract" } }"#).unwrap();

        assert_eq!(config.pdf.engine, PdfEngine::PdfExtract);
        assert!(config.pdf.decrypt_empty_password);
        assert_eq!(config.export.file_name, "invoice_data.xlsx");
        assert_eq!(config.export.format, ExportFormat::Xlsx);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ShopinvConfig::default();
        config.pdf.max_pages = 3;
        config.export.sheet_name = "Orders".to_string();
        config.save(&path).unwrap();

        let loaded = ShopinvConfig::from_file(&path).unwrap();
        assert_eq!(loaded.pdf.max_pages, 3);
        assert_eq!(loaded.export.sheet_name, "Orders");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = ShopinvConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ShopinvError::Io(_)));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ShopinvConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ShopinvError::Config(_)));
    }
}
