//! Snapshot persistence operations.
//!
//! The gateway policy lives here: scope the existence check to the current
//! run only. A business key seen in an earlier run always produces a new
//! snapshot row, because version history is reconstructed from the per-run
//! snapshot sequence. Only an exact duplicate (same content digest) within
//! the same run is deduplicated.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Transaction};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tenderwatch_core::errors::{IngestError, IngestErrorKind};

/// A normalized record ready to enter the snapshot ledger.
#[derive(Debug, Clone)]
pub struct NewSnapshot {
    /// Stable business key of the tender
    pub tender_ref: String,
    /// Run/category scope the record was captured in
    pub run_id: String,
    /// Source identity the record came from
    pub source_identity: String,
    /// Normalized field name → normalized value
    pub fields: BTreeMap<String, String>,
}

/// Result of a snapshot commit operation.
#[derive(Debug, Clone)]
pub struct SnapshotCommitResult {
    /// Unique snapshot identifier (UUIDv7)
    pub snapshot_id: String,
    /// Strictly-increasing insertion marker
    pub seq: i64,
    /// SHA256 digest of the canonical field JSON
    pub content_digest: String,
    /// Whether this was a duplicate within the run (idempotent return)
    pub was_duplicate: bool,
}

/// Compute the content digest of a normalized field map.
///
/// BTreeMap ordering makes the JSON canonical, so the same fields always
/// produce the same digest (hex-encoded SHA256, 64 characters).
pub fn compute_content_digest(fields: &BTreeMap<String, String>) -> Result<String> {
    let canonical = serde_json::to_string(fields).map_err(|e| {
        IngestError::new(IngestErrorKind::Serialization)
            .with_op("compute_content_digest")
            .with_message(format!("Failed to serialize fields: {}", e))
    })?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Query for an existing snapshot in the same run with the same content.
fn query_run_duplicate(
    tx: &Transaction,
    run_id: &str,
    tender_ref: &str,
    content_digest: &str,
) -> Result<Option<SnapshotCommitResult>> {
    tx.query_row(
        "SELECT snapshot_id, seq, content_digest
         FROM snapshots
         WHERE run_id = ?1 AND tender_ref = ?2 AND content_digest = ?3
         LIMIT 1",
        rusqlite::params![run_id, tender_ref, content_digest],
        |row| {
            Ok(SnapshotCommitResult {
                snapshot_id: row.get(0)?,
                seq: row.get(1)?,
                content_digest: row.get(2)?,
                was_duplicate: true,
            })
        },
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Commit a snapshot to the ledger, deduplicating within the run scope.
///
/// Inside one transaction:
/// 1. Look for an existing row with the same `(run_id, tender_ref,
///    content_digest)`. A hit means idempotent re-ingestion of the same
///    batch, and the existing snapshot is returned with
///    `was_duplicate = true`.
/// 2. Otherwise insert a new immutable row. A UNIQUE violation from a
///    concurrent writer is recovered by re-reading and reusing the winning
///    row rather than erroring.
///
/// Store unavailability surfaces as a `Persistence` error and fails the
/// whole record; versioning is never silently skipped.
pub fn commit_snapshot(conn: &mut Connection, snapshot: NewSnapshot) -> Result<SnapshotCommitResult> {
    let content_digest = compute_content_digest(&snapshot.fields)?;
    let fields_json = serde_json::to_string(&snapshot.fields).map_err(|e| {
        IngestError::new(IngestErrorKind::Serialization)
            .with_op("commit_snapshot")
            .with_message(format!("Failed to serialize fields: {}", e))
    })?;

    let tx = conn.transaction().map_err(|e| {
        IngestError::new(IngestErrorKind::Persistence)
            .with_op("commit_snapshot")
            .with_message(format!("Failed to start transaction: {}", e))
    })?;

    // 1. Run-scoped dedup check
    if let Some(existing) =
        query_run_duplicate(&tx, &snapshot.run_id, &snapshot.tender_ref, &content_digest)?
    {
        tracing::debug!(
            snapshot_id = %existing.snapshot_id,
            tender_ref = %snapshot.tender_ref,
            run_id = %snapshot.run_id,
            event = "reuse",
            "Identical record already snapshotted in this run (idempotent)"
        );
        tx.commit().map_err(from_rusqlite)?;
        return Ok(existing);
    }

    // 2. Insert a new immutable row
    let snapshot_id = uuid::Uuid::now_v7().to_string();
    let created_at = chrono::Utc::now().timestamp_millis();

    let inserted = tx.execute(
        "INSERT INTO snapshots
         (snapshot_id, tender_ref, run_id, source_identity, fields, content_digest, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            snapshot_id,
            snapshot.tender_ref,
            snapshot.run_id,
            snapshot.source_identity,
            fields_json,
            content_digest,
            created_at,
        ],
    );

    match inserted {
        Ok(_) => {
            let seq = tx.last_insert_rowid();
            tx.commit().map_err(from_rusqlite)?;

            tracing::debug!(
                snapshot_id = %snapshot_id,
                seq = seq,
                tender_ref = %snapshot.tender_ref,
                run_id = %snapshot.run_id,
                "Created snapshot ledger entry"
            );

            Ok(SnapshotCommitResult {
                snapshot_id,
                seq,
                content_digest,
                was_duplicate: false,
            })
        }
        Err(e) if is_unique_violation(&e) => {
            // A concurrent writer won the race on (run, key, digest):
            // re-read and reuse the winning snapshot
            let existing = query_run_duplicate(
                &tx,
                &snapshot.run_id,
                &snapshot.tender_ref,
                &content_digest,
            )?
            .ok_or_else(|| {
                IngestError::new(IngestErrorKind::Concurrency)
                    .with_op("commit_snapshot")
                    .with_tender_ref(snapshot.tender_ref.clone())
                    .with_message("Unique violation but winning snapshot not readable")
            })?;
            tx.commit().map_err(from_rusqlite)?;

            tracing::debug!(
                snapshot_id = %existing.snapshot_id,
                tender_ref = %snapshot.tender_ref,
                event = "reuse",
                "Lost snapshot race, reusing winner"
            );
            Ok(existing)
        }
        Err(e) => Err(from_rusqlite(e)),
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        crate::migrations::apply_migrations(&mut conn).unwrap();
        conn
    }

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn new_snapshot(run_id: &str, tender_ref: &str, value: &str) -> NewSnapshot {
        NewSnapshot {
            tender_ref: tender_ref.to_string(),
            run_id: run_id.to_string(),
            source_identity: "portal@example.com".to_string(),
            fields: fields(&[("tender_value", value)]),
        }
    }

    fn snapshot_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM snapshots", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn test_content_digest_is_canonical() {
        let a = fields(&[("b", "2"), ("a", "1")]);
        let b = fields(&[("a", "1"), ("b", "2")]);
        assert_eq!(
            compute_content_digest(&a).unwrap(),
            compute_content_digest(&b).unwrap()
        );
        assert_eq!(compute_content_digest(&a).unwrap().len(), 64);
    }

    #[test]
    fn test_same_record_same_run_deduplicates() {
        let mut conn = setup();
        let r1 = commit_snapshot(&mut conn, new_snapshot("run-1", "TDR-1", "100")).unwrap();
        let r2 = commit_snapshot(&mut conn, new_snapshot("run-1", "TDR-1", "100")).unwrap();

        assert!(!r1.was_duplicate);
        assert!(r2.was_duplicate);
        assert_eq!(r1.snapshot_id, r2.snapshot_id);
        assert_eq!(snapshot_count(&conn), 1);
    }

    #[test]
    fn test_same_record_different_run_creates_new_snapshot() {
        let mut conn = setup();
        let r1 = commit_snapshot(&mut conn, new_snapshot("run-1", "TDR-1", "100")).unwrap();
        let r2 = commit_snapshot(&mut conn, new_snapshot("run-2", "TDR-1", "100")).unwrap();

        // Identical content, but a new run means a new version trail entry
        assert!(!r2.was_duplicate);
        assert_ne!(r1.snapshot_id, r2.snapshot_id);
        assert!(r2.seq > r1.seq);
        assert_eq!(snapshot_count(&conn), 2);
    }

    #[test]
    fn test_changed_content_same_run_creates_new_snapshot() {
        let mut conn = setup();
        let r1 = commit_snapshot(&mut conn, new_snapshot("run-1", "TDR-1", "100")).unwrap();
        let r2 = commit_snapshot(&mut conn, new_snapshot("run-1", "TDR-1", "200")).unwrap();

        assert!(!r2.was_duplicate);
        assert_ne!(r1.content_digest, r2.content_digest);
        assert_eq!(snapshot_count(&conn), 2);
    }

    #[test]
    fn test_seq_is_strictly_increasing() {
        let mut conn = setup();
        let mut last_seq = 0;
        for run in ["run-1", "run-2", "run-3"] {
            let r = commit_snapshot(&mut conn, new_snapshot(run, "TDR-1", "100")).unwrap();
            assert!(r.seq > last_seq);
            last_seq = r.seq;
        }
    }
}
