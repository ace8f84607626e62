//! Batch command - extract many invoices and export one merged table.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use shopinv_core::export::export;
use shopinv_core::invoice::rules::format_inr;
use shopinv_core::models::table::COLUMNS;
use shopinv_core::{
    AggregateTable, BatchDocument, BatchReport, DocumentReport, ExportFormat,
    ExtractionCoordinator, ExtractionError,
};

use super::{is_supported_input, load_config, read_document};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Export format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FormatArg {
    /// Excel workbook
    Xlsx,
    /// Comma-separated values
    Csv,
    /// JSON array of rows
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => ExportFormat::Xlsx,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_input(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let coordinator = ExtractionCoordinator::new().with_pdf_config(config.pdf.clone());
    let mut report = BatchReport::new();
    let mut unreadable: Vec<(PathBuf, String)> = Vec::new();

    for path in files {
        match read_document(&path) {
            Ok(document) => {
                let result = coordinator.process(&document);
                pb.suspend(|| println!("{}", document_line(&document, &result)));
                report.push(result);
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                unreadable.push((path, e.to_string()));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    let table = match report.aggregate() {
        Ok(table) => table,
        Err(ExtractionError::NoValidInvoices) => {
            println!("{} No valid invoices found", style("⚠").yellow());
            print_failures(&unreadable);
            return Ok(());
        }
    };

    let format = args.format.map(ExportFormat::from).unwrap_or(config.export.format);
    let artifact = export(&table, format, &config.export)?;

    let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;
    let output_path = output_dir.join(&artifact.file_name);
    fs::write(&output_path, &artifact.data)?;
    debug!("Wrote {} ({})", output_path.display(), artifact.mime_type);

    println!();
    println!("{}", format_table(&table));

    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.documents.len() + unreadable.len(),
        start.elapsed()
    );
    println!(
        "   {} exported, {} unsupported, {} unreadable",
        style(table.len()).green(),
        style(report.unsupported().count()).yellow(),
        style(unreadable.len()).red()
    );
    println!("   Total amount: ₹{}", format_inr(table.total_amount()));
    println!(
        "{} Table written to {}",
        style("✓").green(),
        output_path.display()
    );

    print_failures(&unreadable);

    Ok(())
}

fn document_line(document: &BatchDocument, result: &DocumentReport) -> String {
    if !result.is_supported() {
        return format!(
            "{} {}: unsupported format",
            style("⚠").yellow(),
            document.name
        );
    }

    let mut line = format!(
        "{} {}: {} invoice ({}ms)",
        style("✓").green(),
        document.name,
        result.vendor(),
        result.processing_time_ms
    );
    if let Some(identity) = result.record.identity() {
        let amount = result
            .record
            .amount()
            .map(|a| format!("₹{}", format_inr(a)))
            .unwrap_or_default();
        line.push_str(&format!(
            "\n    Order ID: {} | Order Date: {} | Invoice Number: {} | Seller: {} | Amount: {}",
            identity.order_id,
            identity.order_date,
            identity.invoice_number,
            identity.seller,
            amount
        ));
    }
    for warning in &result.warnings {
        line.push_str(&format!("\n    - {}", warning));
    }
    if let Some(reason) = &result.read_error {
        line.push_str(&format!("\n    - text extraction stopped early: {}", reason));
    }
    line
}

/// Merged rows as a padded text table.
fn format_table(table: &AggregateTable) -> String {
    let rows: Vec<[String; 6]> = table
        .rows
        .iter()
        .map(|row| {
            let [source, order_id, order_date, invoice_number, seller] = row.text_cells();
            [
                source.to_string(),
                order_id.to_string(),
                order_date.to_string(),
                invoice_number.to_string(),
                seller.to_string(),
                row.amount.map(format_inr).unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(cell.chars().count());
        }
    }

    let mut lines = vec![render_row(COLUMNS.iter().copied(), &widths)];
    for row in &rows {
        lines.push(render_row(row.iter().map(String::as_str), &widths));
    }
    lines.join("\n")
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn print_failures(unreadable: &[(PathBuf, String)]) {
    if unreadable.is_empty() {
        return;
    }

    println!();
    println!("{}", style("Failed files:").red());
    for (path, error) in unreadable {
        println!("  - {}: {}", path.display(), error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_table_aligns_columns() {
        let coordinator = ExtractionCoordinator::new();
        let documents = vec![
            BatchDocument::text("a.txt", "Amazon\nOrder Number: 402-1\nInvoice Value: 1299"),
            BatchDocument::text("f.txt", "Flipkart\nOrder ID: OD42\nGrand Total\n₹ 2,500.00"),
        ];
        let table = coordinator.run(&documents).aggregate().unwrap();

        let text = format_table(&table);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Source    Order ID"));
        assert!(lines[1].starts_with("Amazon    402-1"));
        assert!(lines[1].ends_with("1,299.00"));
        assert!(lines[2].starts_with("Flipkart  OD42"));
        assert!(lines[2].ends_with("2,500.00"));
    }

    #[test]
    fn test_document_line_shows_record_fields() {
        let coordinator = ExtractionCoordinator::new();
        let document = BatchDocument::text("a.txt", "Amazon\nOrder Number: 402-1 x");
        let result = coordinator.process(&document);

        let line = document_line(&document, &result);
        assert!(line.contains("a.txt: Amazon invoice"));
        assert!(line.contains("Order ID: 402-1 |"));
        assert!(line.contains("- Could not extract Total Amount"));
    }
}
