//! Baseline set/show commands

use clap::{Args, Subcommand};
use tenderwatch_engine::commands::baseline::{set_baseline, show_baseline};

#[derive(Debug, Args)]
pub struct BaselineArgs {
    #[command(subcommand)]
    pub command: BaselineCommand,
}

#[derive(Debug, Subcommand)]
pub enum BaselineCommand {
    /// Register a known-good document as the active baseline for a source
    Set(SetArgs),
    /// Show the active baseline for a source
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Source identity (e.g. sender address)
    #[arg(long)]
    pub source: String,

    /// Path to a known-good document
    #[arg(long)]
    pub file: String,

    /// Optional description of the template
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, default_value = ".tenderwatch/store.db")]
    pub db: String,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Source identity (e.g. sender address)
    #[arg(long)]
    pub source: String,

    #[arg(long, default_value = ".tenderwatch/store.db")]
    pub db: String,
}

pub fn execute(args: BaselineArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        BaselineCommand::Set(set_args) => execute_set(set_args),
        BaselineCommand::Show(show_args) => execute_show(show_args),
    }
}

fn execute_set(args: SetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let body = std::fs::read_to_string(&args.file)?;
    let mut conn = super::open_store(&args.db)?;

    let row = set_baseline(&mut conn, &body, &args.source, args.description.as_deref())?;

    println!("Template baseline set");
    println!("  Source:      {}", row.source_identity);
    println!("  Fingerprint: {}", row.fingerprint);
    println!("  ID:          {}", row.id);
    if let Some(description) = &row.description {
        println!("  Description: {}", description);
    }
    Ok(())
}

fn execute_show(args: ShowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = super::open_store(&args.db)?;

    match show_baseline(&conn, &args.source)? {
        Some(row) => {
            println!("Active baseline for {}", row.source_identity);
            println!("  Fingerprint:       {}", row.fingerprint);
            println!("  ID:                {}", row.id);
            println!("  Last validated at: {}", super::history::format_ms(row.last_validated_at));
            if let Some(description) = &row.description {
                println!("  Description:       {}", description);
            }
        }
        None => {
            println!("No active baseline for {}", args.source);
        }
    }
    Ok(())
}
