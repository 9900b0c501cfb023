//! Record ingestion orchestration.
//!
//! ## Pipeline (in order):
//! 1. Fingerprint gate when a raw document is attached (hard stop on
//!    mismatch, no writes; first contact attaches a warning)
//! 2. Normalize raw fields (per-field failures degrade to absent)
//! 3. Commit snapshot (run-scoped dedup; duplicate short-circuits)
//! 4. Fetch the previous snapshot by sequence (none → first observation)
//! 5. Diff and classify into typed change events
//! 6. Record events (idempotent per snapshot pair)
//! 7. Dispatch follow-up work per fresh event; failures are reported onto
//!    the event rows, never rolled back

#![allow(clippy::result_large_err)]

use crate::commands::validate::{validate_document, ValidationOutcome, ValidatorConfig};
use rusqlite::Connection;
use tenderwatch_core::diff::{classify_changes, compute_field_changes};
use tenderwatch_core::dispatch::FollowUpDispatcher;
use tenderwatch_core::record::{normalize_fields, RawTenderRecord};
use tenderwatch_store::errors::Result;
use tenderwatch_store::history::{self, HistoryEventRow};
use tenderwatch_store::snapshot::persist::{commit_snapshot, NewSnapshot, SnapshotCommitResult};
use tenderwatch_store::snapshot::query::fetch_previous_snapshot;

/// How an ingested record affected the version trail.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// Exact duplicate within the run; the existing snapshot was reused
    DuplicateInRun,
    /// First snapshot of this tender; nothing to compare against
    FirstObservation,
    /// A previous snapshot exists and every compared field is equal
    NoChange,
    /// Differences were detected and recorded
    ChangesDetected {
        /// Freshly recorded history events, in classification order
        events: Vec<HistoryEventRow>,
    },
}

/// Result of ingesting one record.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// The snapshot this record resolved to (created or reused)
    pub snapshot: SnapshotCommitResult,
    /// What change detection concluded
    pub outcome: IngestOutcome,
    /// First-contact warning from the fingerprint gate, if any
    pub warning: Option<String>,
}

/// Ingest one parsed record through the full pipeline.
///
/// # Errors
///
/// - `TemplateMismatch` / `BaselineRequired` — the fingerprint gate
///   rejected the document; nothing was persisted
/// - `Persistence` — the store failed; the whole record fails rather than
///   silently skipping versioning
pub fn ingest_record(
    conn: &mut Connection,
    record: RawTenderRecord,
    config: &ValidatorConfig,
    dispatcher: &dyn FollowUpDispatcher,
) -> Result<IngestReport> {
    // 1. Fingerprint gate (before any field is trusted)
    let warning = match &record.document {
        Some(body) => match validate_document(conn, body, &record.source_identity, config)? {
            ValidationOutcome::Validated { .. } => None,
            ValidationOutcome::FirstContact { warning, .. } => Some(warning),
        },
        None => None,
    };

    // 2. Normalize
    let fields = normalize_fields(&record.fields);

    // 3. Snapshot (run-scoped dedup)
    let snapshot = commit_snapshot(
        conn,
        NewSnapshot {
            tender_ref: record.tender_ref.clone(),
            run_id: record.run_id.clone(),
            source_identity: record.source_identity.clone(),
            fields: fields.clone(),
        },
    )?;

    if snapshot.was_duplicate {
        tracing::debug!(
            tender_ref = %record.tender_ref,
            run_id = %record.run_id,
            snapshot_id = %snapshot.snapshot_id,
            "Duplicate within run, skipping change detection"
        );
        return Ok(IngestReport {
            snapshot,
            outcome: IngestOutcome::DuplicateInRun,
            warning,
        });
    }

    // 4. Previous version by sequence
    let Some(previous) = fetch_previous_snapshot(conn, &record.tender_ref, snapshot.seq)? else {
        return Ok(IngestReport {
            snapshot,
            outcome: IngestOutcome::FirstObservation,
            warning,
        });
    };

    // 5. Diff and classify
    let changes = compute_field_changes(&previous.parse_fields()?, &fields);
    if changes.is_empty() {
        return Ok(IngestReport {
            snapshot,
            outcome: IngestOutcome::NoChange,
            warning,
        });
    }
    let events = classify_changes(&record.tender_ref, &snapshot.snapshot_id, &changes);

    tracing::info!(
        tender_ref = %record.tender_ref,
        snapshot_id = %snapshot.snapshot_id,
        previous_snapshot_id = %previous.snapshot_id,
        changed_fields = changes.len(),
        events = events.len(),
        "Corrigendum detected between consecutive snapshots"
    );

    // 6. Record (idempotent per snapshot pair)
    let recorded = history::record_events(conn, &events)?;

    // 7. Dispatch follow-up work, at most once per fresh event
    for row in &recorded {
        let Some(event) = events.iter().find(|e| e.kind.as_str() == row.kind) else {
            continue;
        };
        if let Err(err) = dispatcher.dispatch(event) {
            tracing::warn!(
                tender_ref = %record.tender_ref,
                event_id = %row.id,
                error = %err,
                "Follow-up dispatch failed, reporting on event row"
            );
            history::mark_dispatch_failed(conn, &row.id, &err.to_string())?;
        }
    }

    Ok(IngestReport {
        snapshot,
        outcome: IngestOutcome::ChangesDetected { events: recorded },
        warning,
    })
}
