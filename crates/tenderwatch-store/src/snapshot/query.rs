//! Read-only snapshot query operations.
//!
//! Provides structured row queries for the snapshot ledger, ordered by the
//! insertion sequence, without mutating any state.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use std::collections::BTreeMap;
use tenderwatch_core::errors::{IngestError, IngestErrorKind};

/// A raw row from the `snapshots` ledger table.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotRow {
    /// Strictly-increasing insertion marker
    pub seq: i64,
    /// Unique snapshot identifier (UUIDv7)
    pub snapshot_id: String,
    /// Stable business key of the tender
    pub tender_ref: String,
    /// Run/category scope this snapshot was captured in
    pub run_id: String,
    /// Source identity the record came from
    pub source_identity: String,
    /// Normalized field JSON as stored
    pub fields_json: String,
    /// SHA256 digest of the canonical field JSON
    pub content_digest: String,
    /// Creation timestamp, milliseconds since epoch
    pub created_at: i64,
}

impl SnapshotRow {
    /// Parse the stored field JSON into a normalized field map.
    ///
    /// # Errors
    ///
    /// - `Serialization` — the stored JSON is not a string map (ledger
    ///   corruption; snapshots are written from typed maps only)
    pub fn parse_fields(&self) -> Result<BTreeMap<String, String>> {
        serde_json::from_str(&self.fields_json).map_err(|e| {
            IngestError::new(IngestErrorKind::Serialization)
                .with_op("parse_fields")
                .with_tender_ref(self.tender_ref.clone())
                .with_message(format!("Stored field JSON unreadable: {}", e))
        })
    }
}

/// Fetch a full `SnapshotRow` by snapshot ID.
///
/// # Errors
///
/// - `NotFound` — no row with the given `snapshot_id` exists
/// - `Persistence` — SQLite read failed
pub fn fetch_snapshot_row(conn: &Connection, snapshot_id: &str) -> Result<SnapshotRow> {
    conn.query_row(
        "SELECT seq, snapshot_id, tender_ref, run_id, source_identity,
                fields, content_digest, created_at
         FROM snapshots WHERE snapshot_id = ?1",
        [snapshot_id],
        row_to_snapshot_row,
    )
    .optional()
    .map_err(from_rusqlite)?
    .ok_or_else(|| {
        IngestError::new(IngestErrorKind::NotFound)
            .with_op("fetch_snapshot_row")
            .with_message(format!("snapshot not found: {}", snapshot_id))
    })
}

/// Fetch the most recent snapshot of a tender strictly older than the
/// given sequence number, across all runs.
///
/// This is the "previous version" the change detector compares against.
/// Returns `None` for a first observation.
pub fn fetch_previous_snapshot(
    conn: &Connection,
    tender_ref: &str,
    before_seq: i64,
) -> Result<Option<SnapshotRow>> {
    conn.query_row(
        "SELECT seq, snapshot_id, tender_ref, run_id, source_identity,
                fields, content_digest, created_at
         FROM snapshots
         WHERE tender_ref = ?1 AND seq < ?2
         ORDER BY seq DESC
         LIMIT 1",
        rusqlite::params![tender_ref, before_seq],
        row_to_snapshot_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

/// List all snapshot rows for a tender, ordered by insertion sequence.
pub fn list_snapshot_rows(conn: &Connection, tender_ref: &str) -> Result<Vec<SnapshotRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT seq, snapshot_id, tender_ref, run_id, source_identity,
                    fields, content_digest, created_at
             FROM snapshots
             WHERE tender_ref = ?1
             ORDER BY seq",
        )
        .map_err(from_rusqlite)?;
    let result: std::result::Result<Vec<_>, _> = stmt
        .query_map([tender_ref], row_to_snapshot_row)
        .map_err(from_rusqlite)?
        .collect();
    result.map_err(from_rusqlite)
}

fn row_to_snapshot_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SnapshotRow> {
    Ok(SnapshotRow {
        seq: row.get(0)?,
        snapshot_id: row.get(1)?,
        tender_ref: row.get(2)?,
        run_id: row.get(3)?,
        source_identity: row.get(4)?,
        fields_json: row.get(5)?,
        content_digest: row.get(6)?,
        created_at: row.get(7)?,
    })
}
