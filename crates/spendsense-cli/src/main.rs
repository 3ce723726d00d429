mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::analyze::AnalyzeArgs;
use commands::validate::ValidateArgs;

/// Impulsive-spending risk analysis for transaction datasets
#[derive(Parser)]
#[command(
    name = "spendsense",
    version,
    about = "Impulsive-spending risk analysis for transaction datasets",
    long_about = "A CLI that runs transaction datasets through SpendSense's rule \
                  detectors and anomaly scorer. Flags budget drains, late-night \
                  purchases, new recipients, frequency bursts, and device/location \
                  anomalies, then reports dashboard metrics and the intercept log."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full risk pipeline over a CSV or JSON dataset
    Analyze(AnalyzeArgs),
    /// Parse and validate a dataset without evaluating it
    Validate(ValidateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    // Diagnostics go to stderr so piped stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analyze::run_analyze(args),
        Commands::Validate(args) => commands::validate::run_validate(args),
        Commands::Version => {
            println!("spendsense {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
