//! Tender history repository.
//!
//! Persists classified change events and serves them to the history/API
//! layer. Event production is idempotent per snapshot pair: the
//! `(snapshot_id, kind)` unique constraint absorbs re-detection, so the
//! same pair never yields duplicate rows.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use tenderwatch_core::diff::ChangeEvent;

/// A row from the `tender_history` table.
///
/// Serializable as-is for the history/API layer.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEventRow {
    /// Unique event identifier (UUIDv7)
    pub id: String,
    /// Logical tender identifier
    pub tender_ref: String,
    /// Stable change kind string
    pub kind: String,
    /// Human-readable description of what changed
    pub note: String,
    /// Previous date value, for date-like changes
    pub before_date: Option<String>,
    /// New date value, for date-like changes
    pub after_date: Option<String>,
    /// Detection timestamp, milliseconds since epoch
    pub detected_at: i64,
    /// The newer snapshot that triggered the event
    pub snapshot_id: String,
    /// Follow-up dispatch failure report, if any
    pub dispatch_error: Option<String>,
}

/// Record classified change events, returning only the freshly inserted
/// rows.
///
/// Events already present for the same `(snapshot_id, kind)` are skipped
/// silently: re-running detection over an existing pair is a no-op, and
/// follow-up work is only dispatched for rows this call actually created.
pub fn record_events(conn: &mut Connection, events: &[ChangeEvent]) -> Result<Vec<HistoryEventRow>> {
    let now = chrono::Utc::now().timestamp_millis();

    let tx = conn.transaction().map_err(from_rusqlite)?;
    let mut recorded = Vec::new();

    for event in events {
        let id = uuid::Uuid::now_v7().to_string();
        let inserted = tx
            .execute(
                "INSERT OR IGNORE INTO tender_history
                 (id, tender_ref, kind, note, before_date, after_date,
                  detected_at, snapshot_id, dispatch_error)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL)",
                rusqlite::params![
                    id,
                    event.tender_ref,
                    event.kind.as_str(),
                    event.note,
                    event.before_date,
                    event.after_date,
                    now,
                    event.snapshot_id,
                ],
            )
            .map_err(from_rusqlite)?;

        if inserted == 1 {
            recorded.push(HistoryEventRow {
                id,
                tender_ref: event.tender_ref.clone(),
                kind: event.kind.as_str().to_string(),
                note: event.note.clone(),
                before_date: event.before_date.clone(),
                after_date: event.after_date.clone(),
                detected_at: now,
                snapshot_id: event.snapshot_id.clone(),
                dispatch_error: None,
            });
            tracing::info!(
                tender_ref = %event.tender_ref,
                kind = %event.kind,
                snapshot_id = %event.snapshot_id,
                "Change event recorded"
            );
        }
    }

    tx.commit().map_err(from_rusqlite)?;
    Ok(recorded)
}

/// Check whether any events already exist for a snapshot.
pub fn events_exist_for_snapshot(conn: &Connection, snapshot_id: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM tender_history WHERE snapshot_id = ?1 LIMIT 1",
            [snapshot_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;
    Ok(found.is_some())
}

/// List the ordered change history of a tender.
pub fn list_events_for_tender(conn: &Connection, tender_ref: &str) -> Result<Vec<HistoryEventRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, tender_ref, kind, note, before_date, after_date,
                    detected_at, snapshot_id, dispatch_error
             FROM tender_history
             WHERE tender_ref = ?1
             ORDER BY detected_at, id",
        )
        .map_err(from_rusqlite)?;
    let result: std::result::Result<Vec<_>, _> = stmt
        .query_map([tender_ref], row_to_history_row)
        .map_err(from_rusqlite)?
        .collect();
    result.map_err(from_rusqlite)
}

/// Report a follow-up dispatch failure back onto the event row.
///
/// The event itself stays committed; ingestion correctness does not depend
/// on its consumers.
pub fn mark_dispatch_failed(conn: &Connection, event_id: &str, error: &str) -> Result<()> {
    conn.execute(
        "UPDATE tender_history SET dispatch_error = ?1 WHERE id = ?2",
        rusqlite::params![error, event_id],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

fn row_to_history_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<HistoryEventRow> {
    Ok(HistoryEventRow {
        id: row.get(0)?,
        tender_ref: row.get(1)?,
        kind: row.get(2)?,
        note: row.get(3)?,
        before_date: row.get(4)?,
        after_date: row.get(5)?,
        detected_at: row.get(6)?,
        snapshot_id: row.get(7)?,
        dispatch_error: row.get(8)?,
    })
}
