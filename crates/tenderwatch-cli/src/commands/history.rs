//! Tender change history command

use clap::Args;
use tenderwatch_store::history::list_events_for_tender;
use tenderwatch_store::snapshot::query::list_snapshot_rows;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Logical tender identifier (business key)
    #[arg(long)]
    pub tender: String,

    /// Also list the underlying snapshot version trail
    #[arg(long)]
    pub versions: bool,

    #[arg(long, default_value = ".tenderwatch/store.db")]
    pub db: String,
}

pub fn execute(args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = super::open_store(&args.db)?;
    let events = list_events_for_tender(&conn, &args.tender)?;

    if events.is_empty() {
        println!("No recorded changes for {}", args.tender);
    } else {
        println!("Change history for {}", args.tender);
        for event in &events {
            println!(
                "  {}  {:<24} {}",
                format_ms(event.detected_at),
                event.kind,
                event.note
            );
            if let Some(error) = &event.dispatch_error {
                println!("      follow-up dispatch failed: {}", error);
            }
        }
    }

    if args.versions {
        let rows = list_snapshot_rows(&conn, &args.tender)?;
        println!("Snapshot versions: {}", rows.len());
        for (index, row) in rows.iter().enumerate() {
            println!(
                "  v{} seq={} run={} captured={} digest={}",
                index + 1,
                row.seq,
                row.run_id,
                format_ms(row.created_at),
                &row.content_digest[..row.content_digest.len().min(16)],
            );
        }
    }
    Ok(())
}

/// Render a milliseconds-since-epoch timestamp as UTC.
pub fn format_ms(ms: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ms.to_string(),
    }
}
