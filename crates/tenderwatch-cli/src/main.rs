//! TenderWatch CLI
//!
//! Operator command-line interface for the tender ingestion pipeline

use clap::{Parser, Subcommand};
use tenderwatch_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "tenderwatch")]
#[command(about = "TenderWatch - tender ingestion trust and change detection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Template baseline operations (set/show)
    Baseline(commands::baseline::BaselineArgs),
    /// Run the fingerprint gate against a document
    Validate(commands::validate::ValidateArgs),
    /// Ingest a batch of parsed records
    Ingest(commands::ingest::IngestArgs),
    /// List the change history of a tender
    History(commands::history::HistoryArgs),
}

fn main() {
    init(Profile::Development);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Baseline(args) => commands::baseline::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Ingest(args) => commands::ingest::execute(args),
        Commands::History(args) => commands::history::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
