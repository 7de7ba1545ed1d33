//! Batch command - parse many invoice PDFs into one record table.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use findoc_core::batch::{BatchFailure, BatchOutcome};
use findoc_core::{export_records, process_source};

use super::expand_pdf_inputs;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output CSV file
    #[arg(short, long, default_value = "invoices.csv")]
    output: PathBuf,
}

pub fn run(args: BatchArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let files = expand_pdf_inputs(&args.input)?;

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let outcome = assemble_with_progress(&files);

    export_records(&args.output, &outcome.records)?;

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        files.len(),
        start.elapsed()
    );
    println!(
        "   {} parsed, {} skipped",
        style(outcome.records.len()).green(),
        style(outcome.failures.len()).red()
    );
    println!(
        "{} Record table written to {}",
        style("✓").green(),
        args.output.display()
    );

    print_failures(&outcome.failures);

    Ok(())
}

/// Run the per-file pipeline with a progress bar; parse failures are
/// collected, never fatal.
pub fn assemble_with_progress(files: &[PathBuf]) -> BatchOutcome {
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut outcome = BatchOutcome::default();

    for path in files {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let result = fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|data| process_source(&data).map_err(|e| e.to_string()));

        match result {
            Ok(record) => outcome.records.push(record),
            Err(error) => {
                warn!("skipping {}: {}", path.display(), error);
                outcome.failures.push(BatchFailure { name, error });
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");
    outcome
}

pub fn print_failures(failures: &[BatchFailure]) {
    if failures.is_empty() {
        return;
    }
    println!();
    println!("{}", style("Skipped files:").red());
    for failure in failures {
        println!("  - {}: {}", failure.name, failure.error);
    }
}
