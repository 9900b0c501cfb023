//! Batch ingestion command

use clap::Args;
use tenderwatch_core::dispatch::NoopFollowUpDispatcher;
use tenderwatch_core::record::RawTenderRecord;
use tenderwatch_engine::commands::ingest::{ingest_record, IngestOutcome};
use tenderwatch_engine::commands::validate::ValidatorConfig;

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Path to a JSON array of parsed records
    #[arg(long)]
    pub file: String,

    /// Override the run/category identifier for every record in the batch
    #[arg(long)]
    pub run: Option<String>,

    /// Reject sources that have no registered baseline
    #[arg(long)]
    pub require_baseline: bool,

    #[arg(long, default_value = ".tenderwatch/store.db")]
    pub db: String,
}

pub fn execute(args: IngestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&args.file)?;
    let mut records: Vec<RawTenderRecord> = serde_json::from_str(&raw)?;
    if let Some(run_id) = &args.run {
        for record in &mut records {
            record.run_id = run_id.clone();
        }
    }

    let mut conn = super::open_store(&args.db)?;
    let config = ValidatorConfig {
        require_baseline: args.require_baseline,
    };

    let total = records.len();
    let mut failures = 0usize;

    for record in records {
        let tender_ref = record.tender_ref.clone();
        match ingest_record(&mut conn, record, &config, &NoopFollowUpDispatcher) {
            Ok(report) => {
                if let Some(warning) = &report.warning {
                    println!("  warning: {}", warning);
                }
                match report.outcome {
                    IngestOutcome::DuplicateInRun => {
                        println!("{}: duplicate in run (snapshot reused)", tender_ref);
                    }
                    IngestOutcome::FirstObservation => {
                        println!("{}: first observation", tender_ref);
                    }
                    IngestOutcome::NoChange => {
                        println!("{}: new snapshot, no changes", tender_ref);
                    }
                    IngestOutcome::ChangesDetected { events } => {
                        println!("{}: {} change(s) detected", tender_ref, events.len());
                        for event in &events {
                            println!("  - {}: {}", event.kind, event.note);
                        }
                    }
                }
            }
            Err(e) => {
                // Rejections are reported per record, never silently dropped
                eprintln!("{}: REJECTED - {}", tender_ref, e);
                failures += 1;
            }
        }
    }

    println!("Ingested {}/{} records", total - failures, total);
    if failures > 0 {
        return Err(format!("{} record(s) failed ingestion", failures).into());
    }
    Ok(())
}
