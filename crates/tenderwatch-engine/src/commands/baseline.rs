//! Baseline administration.
//!
//! Setting a baseline is an explicit operator operation taking a
//! known-good document, never an automatic side effect of validation.

#![allow(clippy::result_large_err)]

use rusqlite::Connection;
use tenderwatch_core::fingerprint::fingerprint_document;
use tenderwatch_store::baseline::{self, BaselineRow};
use tenderwatch_store::errors::Result;

/// Fingerprint a known-good document and register it as the active
/// baseline for the source identity, deactivating any prior baselines.
pub fn set_baseline(
    conn: &mut Connection,
    body: &str,
    source_identity: &str,
    description: Option<&str>,
) -> Result<BaselineRow> {
    let fingerprint = fingerprint_document(body);
    baseline::set_baseline(conn, source_identity, &fingerprint, description)
}

/// Fetch the active baseline for a source identity, if one is registered.
pub fn show_baseline(conn: &Connection, source_identity: &str) -> Result<Option<BaselineRow>> {
    baseline::find_active(conn, source_identity)
}
