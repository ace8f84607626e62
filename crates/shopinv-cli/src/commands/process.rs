//! Process command - extract data from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use shopinv_core::invoice::rules::format_inr;
use shopinv_core::{DocumentReport, ExtractionCoordinator, InvoiceRecord};

use super::{load_config, read_document};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or pre-extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let document = read_document(&args.input)?;
    let coordinator = ExtractionCoordinator::new().with_pdf_config(config.pdf.clone());
    let report = coordinator.process(&document);

    if let Some(reason) = &report.read_error {
        eprintln!(
            "{} Text extraction stopped early: {}",
            style("⚠").yellow(),
            reason
        );
    }

    if !report.is_supported() {
        eprintln!(
            "{} {}: unsupported format, no fields extracted",
            style("⚠").yellow(),
            report.name
        );
    }

    for warning in &report.warnings {
        eprintln!("  - {}", warning);
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report.record)?,
        OutputFormat::Text => format_report_text(&report),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_report_text(report: &DocumentReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("File:   {}\n", report.name));
    output.push_str(&format!("Source: {}\n", report.vendor()));

    let Some(identity) = report.record.identity() else {
        return output;
    };

    output.push('\n');
    output.push_str(&format!("Order ID:       {}\n", identity.order_id));
    output.push_str(&format!("Order Date:     {}\n", identity.order_date));
    output.push_str(&format!("Invoice Number: {}\n", identity.invoice_number));
    output.push_str(&format!("Seller:         {}\n", identity.seller));

    let label = match report.record {
        InvoiceRecord::Flipkart(_) => "Grand Total",
        _ => "Total Amount",
    };
    let amount = report
        .record
        .amount()
        .map(|a| format!("₹{}", format_inr(a)))
        .unwrap_or_default();
    output.push_str(&format!("{:<15} {}\n", format!("{}:", label), amount));

    output
}
