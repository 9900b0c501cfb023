//! Template baseline repository.
//!
//! Stores the expected structural fingerprint per source identity. At most
//! one baseline is active per source at a time; setting a new one
//! deactivates all prior rows for that source. Rows are never deleted.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;

/// A row from the `template_baselines` table.
///
/// Serializable as-is for operator tooling output.
#[derive(Debug, Clone, Serialize)]
pub struct BaselineRow {
    /// Unique baseline identifier (UUIDv7)
    pub id: String,
    /// Source identity (e.g. sender address)
    pub source_identity: String,
    /// Expected structural fingerprint (64-char lowercase hex SHA256)
    pub fingerprint: String,
    /// Whether this baseline is the active one for the source
    pub is_active: bool,
    /// Optional operator description
    pub description: Option<String>,
    /// Creation timestamp, milliseconds since epoch
    pub created_at: i64,
    /// Last successful validation timestamp, milliseconds since epoch
    pub last_validated_at: i64,
}

/// Fetch the active baseline for a source identity, if any.
pub fn find_active(conn: &Connection, source_identity: &str) -> Result<Option<BaselineRow>> {
    conn.query_row(
        "SELECT id, source_identity, fingerprint, is_active, description,
                created_at, last_validated_at
         FROM template_baselines
         WHERE source_identity = ?1 AND is_active = 1",
        [source_identity],
        row_to_baseline_row,
    )
    .optional()
    .map_err(from_rusqlite)
}

/// Refresh the last-validated timestamp after a successful validation.
pub fn touch_validated(conn: &Connection, baseline_id: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp_millis();
    conn.execute(
        "UPDATE template_baselines SET last_validated_at = ?1 WHERE id = ?2",
        rusqlite::params![now, baseline_id],
    )
    .map_err(from_rusqlite)?;
    Ok(())
}

/// Set or update the expected baseline for a source identity.
///
/// Explicit operator operation, never a side effect of validation. All
/// prior baselines for the source are deactivated first; if a row with the
/// same `(source, fingerprint)` already exists it is reactivated and
/// refreshed (keeping its history), otherwise a new row is inserted.
pub fn set_baseline(
    conn: &mut Connection,
    source_identity: &str,
    fingerprint: &str,
    description: Option<&str>,
) -> Result<BaselineRow> {
    let now = chrono::Utc::now().timestamp_millis();

    let tx = conn.transaction().map_err(from_rusqlite)?;

    // Deactivate every prior baseline for this source
    tx.execute(
        "UPDATE template_baselines SET is_active = 0 WHERE source_identity = ?1",
        [source_identity],
    )
    .map_err(from_rusqlite)?;

    // Reactivate an existing row for the same fingerprint, if present
    let existing_id: Option<String> = tx
        .query_row(
            "SELECT id FROM template_baselines
             WHERE source_identity = ?1 AND fingerprint = ?2",
            rusqlite::params![source_identity, fingerprint],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    let id = match existing_id {
        Some(id) => {
            match description {
                Some(description) => {
                    tx.execute(
                        "UPDATE template_baselines
                         SET is_active = 1, last_validated_at = ?1, description = ?2
                         WHERE id = ?3",
                        rusqlite::params![now, description, id],
                    )
                    .map_err(from_rusqlite)?;
                }
                None => {
                    tx.execute(
                        "UPDATE template_baselines
                         SET is_active = 1, last_validated_at = ?1
                         WHERE id = ?2",
                        rusqlite::params![now, id],
                    )
                    .map_err(from_rusqlite)?;
                }
            }
            id
        }
        None => {
            let id = uuid::Uuid::now_v7().to_string();
            tx.execute(
                "INSERT INTO template_baselines
                 (id, source_identity, fingerprint, is_active, description,
                  created_at, last_validated_at)
                 VALUES (?1, ?2, ?3, 1, ?4, ?5, ?5)",
                rusqlite::params![id, source_identity, fingerprint, description, now],
            )
            .map_err(from_rusqlite)?;
            id
        }
    };

    let row = tx
        .query_row(
            "SELECT id, source_identity, fingerprint, is_active, description,
                    created_at, last_validated_at
             FROM template_baselines WHERE id = ?1",
            [&id],
            row_to_baseline_row,
        )
        .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::info!(
        source_identity = %source_identity,
        fingerprint = %fingerprint,
        baseline_id = %row.id,
        "Template baseline set"
    );

    Ok(row)
}

fn row_to_baseline_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BaselineRow> {
    Ok(BaselineRow {
        id: row.get(0)?,
        source_identity: row.get(1)?,
        fingerprint: row.get(2)?,
        is_active: row.get::<_, i64>(3)? != 0,
        description: row.get(4)?,
        created_at: row.get(5)?,
        last_validated_at: row.get(6)?,
    })
}
