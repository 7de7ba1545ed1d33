//! CLI application for Czech invoice anomaly detection.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, classify, config, process};

/// Czech invoice anomaly detection - parse generated invoice PDFs and
/// flag suspicious ones with a pretrained classifier
#[derive(Parser)]
#[command(name = "findoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single invoice PDF
    Process(process::ProcessArgs),

    /// Parse multiple invoice PDFs into a record table
    Batch(batch::BatchArgs),

    /// Parse and classify invoices for anomalies
    Classify(classify::ClassifyArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Process(args) => process::run(args),
        Commands::Batch(args) => batch::run(args),
        Commands::Classify(args) => classify::run(args, cli.config.as_deref()),
        Commands::Config(args) => config::run(args),
    }
}
