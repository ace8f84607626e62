//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use shopinv_core::{BatchDocument, ShopinvConfig};

/// Load the config from `-c`, else the default location, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ShopinvConfig> {
    if let Some(path) = config_path {
        return Ok(ShopinvConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(ShopinvConfig::from_file(&default_path)?)
    } else {
        Ok(ShopinvConfig::default())
    }
}

/// Whether the file extension is one we can read.
pub fn is_supported_input(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
}

/// Read a `.pdf` or `.txt` file into a batch document named after the file.
pub fn read_document(path: &PathBuf) -> anyhow::Result<BatchDocument> {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => Ok(BatchDocument::pdf(name, fs::read(path)?)),
        "txt" => Ok(BatchDocument::text(name, fs::read_to_string(path)?)),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}
