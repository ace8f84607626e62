//! Aggregate table export: xlsx, csv and json.

use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExportError;
use crate::models::config::ExportConfig;
use crate::models::table::{AggregateTable, COLUMNS};

/// Default file name of the spreadsheet export.
pub const EXPORT_FILE_NAME: &str = "invoice_data.xlsx";

/// MIME type offered with the spreadsheet export.
pub const EXPORT_MIME_TYPE: &str = "application/vnd.ms-excel";

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Output format of the aggregate export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => EXPORT_MIME_TYPE,
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

/// An encoded export, ready to be written or offered for download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// Encode `table` in `format`.
pub fn export(
    table: &AggregateTable,
    format: ExportFormat,
    config: &ExportConfig,
) -> Result<ExportArtifact> {
    let data = match format {
        ExportFormat::Xlsx => to_xlsx(table, config)?,
        ExportFormat::Csv => to_csv(table)?,
        ExportFormat::Json => to_json(table)?,
    };

    let file_name = Path::new(&config.file_name)
        .with_extension(format.extension())
        .to_string_lossy()
        .into_owned();

    debug!("Encoded {} rows as {} ({} bytes)", table.len(), file_name, data.len());

    Ok(ExportArtifact {
        file_name,
        mime_type: format.mime_type(),
        data,
    })
}

/// Drop control characters that break the sheet XML.
fn sanitize_cell(s: &str) -> String {
    s.chars()
        .filter(|&c| c == '\t' || c == '\n' || c == '\r' || !c.is_control())
        .collect()
}

/// Column width from text length (char count × 1.2, clamped 10–50).
fn estimate_text_width(text: &str) -> f64 {
    let w = text.chars().count() as f64 * 1.2;
    w.clamp(10.0, 50.0)
}

fn set_column_widths(
    worksheet: &mut Worksheet,
    table: &AggregateTable,
) -> std::result::Result<(), XlsxError> {
    let mut widths: Vec<f64> = COLUMNS.iter().map(|h| estimate_text_width(h)).collect();
    for row in &table.rows {
        for (col, cell) in row.text_cells().iter().enumerate() {
            widths[col] = widths[col].max(estimate_text_width(cell));
        }
    }
    // Amount column
    widths[COLUMNS.len() - 1] = 14.0;

    for (col, width) in widths.into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width)?;
    }
    Ok(())
}

/// Encode the table as an xlsx workbook.
pub fn to_xlsx(table: &AggregateTable, config: &ExportConfig) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&config.sheet_name)?;

    let header_format = Format::new().set_bold();
    let amount_format = Format::new()
        .set_num_format(&config.amount_format)
        .set_align(FormatAlign::Right);

    set_column_widths(worksheet, table)?;

    for (col, header) in COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    let amount_col = (COLUMNS.len() - 1) as u16;
    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.text_cells().iter().enumerate() {
            worksheet.write_string(r, col as u16, sanitize_cell(cell))?;
        }
        // Missing amounts stay blank
        if let Some(amount) = row.amount.and_then(|a| a.to_f64()) {
            worksheet.write_number_with_format(r, amount_col, amount, &amount_format)?;
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    Ok(workbook.save_to_buffer()?)
}

/// Encode the table as CSV with a header row.
pub fn to_csv(table: &AggregateTable) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(COLUMNS)?;

    for row in &table.rows {
        let [source, order_id, order_date, invoice_number, seller] = row.text_cells();
        let amount = row.amount.map(|a| a.to_string()).unwrap_or_default();
        wtr.write_record([source, order_id, order_date, invoice_number, seller, amount.as_str()])?;
    }

    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// Encode the rows as a pretty-printed JSON array.
pub fn to_json(table: &AggregateTable) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(&table.rows)?)
}
