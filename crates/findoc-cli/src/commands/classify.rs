//! Classify command - parse invoices and flag anomalies.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;

use findoc_core::{
    classify_records, export_classified, export_records, partition_alerts, Artifacts,
    ClassifiedRow, DiskArtifactStore, FindocConfig,
};

use super::batch::{assemble_with_progress, print_failures};
use super::expand_pdf_inputs;

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output CSV file
    #[arg(short, long, default_value = "classified.csv")]
    output: PathBuf,

    /// Directory containing the pretrained artifacts
    #[arg(short, long)]
    artifact_dir: Option<PathBuf>,

    /// Export only flagged rows
    #[arg(long)]
    anomalies_only: bool,
}

pub fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = if let Some(path) = config_path {
        FindocConfig::from_file(Path::new(path))?
    } else {
        FindocConfig::default()
    };
    if let Some(dir) = &args.artifact_dir {
        config.artifacts.artifact_dir = dir.clone();
    }

    let files = expand_pdf_inputs(&args.input)?;
    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let outcome = assemble_with_progress(&files);

    // An unusable artifact set aborts classification but the extracted
    // record table is still worth keeping.
    let store = DiskArtifactStore::new(config.artifacts);
    let artifacts = match Artifacts::load(&store) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            export_records(&args.output, &outcome.records)?;
            println!(
                "{} Classification unavailable; record table written to {}",
                style("!").yellow(),
                args.output.display()
            );
            return Err(e.into());
        }
    };

    let rows = classify_records(&outcome.records, &artifacts)?;
    let flagged: Vec<&ClassifiedRow> =
        rows.iter().filter(|r| r.anomaly_type.is_anomaly()).collect();
    let flagged_count = flagged.len();
    let clean_count = rows.len() - flagged_count;

    print_alerts(&flagged);

    if args.anomalies_only {
        let (flagged_rows, _) = partition_alerts(rows);
        export_classified(&args.output, &flagged_rows)?;
    } else {
        export_classified(&args.output, &rows)?;
    }

    println!();
    println!(
        "{} Classified {} invoices in {:?}",
        style("✓").green(),
        flagged_count + clean_count,
        start.elapsed()
    );
    println!(
        "   {} flagged, {} clean",
        style(flagged_count).red(),
        style(clean_count).green()
    );
    println!(
        "{} Results written to {}",
        style("✓").green(),
        args.output.display()
    );

    print_failures(&outcome.failures);

    Ok(())
}

fn print_alerts(flagged: &[&ClassifiedRow]) {
    if flagged.is_empty() {
        return;
    }
    println!();
    println!("{}", style("Flagged invoices:").yellow());
    for row in flagged {
        println!(
            "  - {} ({}): {} [{:.1}%]",
            row.feature.record.invoice_id,
            row.feature.record.supplier_name,
            row.anomaly_type.label(),
            row.anomaly_confidence * 100.0
        );
    }
}
