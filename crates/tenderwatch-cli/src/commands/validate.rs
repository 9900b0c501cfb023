//! Fingerprint gate command

use clap::Args;
use tenderwatch_engine::commands::validate::{validate_document, ValidationOutcome, ValidatorConfig};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Source identity the document claims to come from
    #[arg(long)]
    pub source: String,

    /// Path to the document to validate
    #[arg(long)]
    pub file: String,

    /// Reject sources that have no registered baseline
    #[arg(long)]
    pub require_baseline: bool,

    #[arg(long, default_value = ".tenderwatch/store.db")]
    pub db: String,
}

pub fn execute(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let body = std::fs::read_to_string(&args.file)?;
    let conn = super::open_store(&args.db)?;

    let config = ValidatorConfig {
        require_baseline: args.require_baseline,
    };

    match validate_document(&conn, &body, &args.source, &config)? {
        ValidationOutcome::Validated { fingerprint } => {
            println!("Validated: document matches the active baseline");
            println!("  Fingerprint: {}", fingerprint);
        }
        ValidationOutcome::FirstContact { fingerprint, warning } => {
            println!("Admitted (first contact): {}", warning);
            println!("  Fingerprint: {}", fingerprint);
        }
    }
    Ok(())
}
