//! Process command - parse a single invoice PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use findoc_core::{process_source, write_records_csv, InvoiceRecord};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
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
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let data = fs::read(&args.input)?;
    let record = process_source(&data)?;

    let output = format_record(&record, args.format)?;

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

fn format_record(record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_records_csv(&mut buf, std::slice::from_ref(record))?;
            Ok(String::from_utf8(buf)?)
        }
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_text(record: &InvoiceRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", record.invoice_id));
    output.push_str(&format!("Variable symbol: {}\n", record.variable_symbol));
    if let Some(date) = record.invoice_date {
        output.push_str(&format!("Issued: {}\n", date));
    }
    if let Some(date) = record.due_date {
        output.push_str(&format!("Due: {}\n", date));
    }
    output.push('\n');

    output.push_str("Supplier:\n");
    output.push_str(&format!("  {}\n", record.supplier_name));
    if !record.supplier_ico.is_empty() {
        output.push_str(&format!("  IČO: {}\n", record.supplier_ico));
    }
    if !record.supplier_dic.is_empty() {
        output.push_str(&format!("  DIČ: {}\n", record.supplier_dic));
    }
    if !record.supplier_account.is_empty() {
        output.push_str(&format!("  Account: {}\n", record.supplier_account));
    }
    output.push('\n');

    output.push_str("Customer:\n");
    output.push_str(&format!("  {}\n", record.customer_name));
    if !record.customer_ico.is_empty() {
        output.push_str(&format!("  IČO: {}\n", record.customer_ico));
    }
    output.push('\n');

    output.push_str(&format!("Items: {}\n", record.items_count));
    output.push_str(&format!("Note: {}\n", record.note));
    output.push_str(&format!(
        "Type: {}\n",
        record.transaction_type.as_str()
    ));
    output.push_str(&format!("Total: {} CZK\n", record.total_amount));

    output
}
