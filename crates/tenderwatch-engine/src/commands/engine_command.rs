//! Engine-level action commands for I/O operations.

#![allow(clippy::result_large_err)]

use crate::commands::baseline::{set_baseline, show_baseline};
use crate::commands::ingest::{ingest_record, IngestReport};
use crate::commands::validate::{validate_document, ValidationOutcome, ValidatorConfig};
use rusqlite::Connection;
use tenderwatch_core::dispatch::FollowUpDispatcher;
use tenderwatch_core::record::RawTenderRecord;
use tenderwatch_store::baseline::BaselineRow;
use tenderwatch_store::errors::Result;

/// Engine-level commands that require I/O (database).
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Ingest one parsed record through the full pipeline.
    Ingest {
        record: RawTenderRecord,
        config: ValidatorConfig,
    },
    /// Run the fingerprint gate without ingesting.
    ValidateDocument {
        body: String,
        source_identity: String,
        config: ValidatorConfig,
    },
    /// Register a known-good document as the active baseline.
    SetBaseline {
        body: String,
        source_identity: String,
        description: Option<String>,
    },
    /// Fetch the active baseline for a source identity.
    ShowBaseline { source_identity: String },
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Ingest(IngestReport),
    ValidateDocument(ValidationOutcome),
    SetBaseline(BaselineRow),
    ShowBaseline(Option<BaselineRow>),
}

/// Apply an engine command with a follow-up dispatcher.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
    dispatcher: &dyn FollowUpDispatcher,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::Ingest { record, config } => {
            let report = ingest_record(conn, record, &config, dispatcher)?;
            Ok(EngineCommandResult::Ingest(report))
        }
        EngineCommand::ValidateDocument {
            body,
            source_identity,
            config,
        } => {
            let outcome = validate_document(conn, &body, &source_identity, &config)?;
            Ok(EngineCommandResult::ValidateDocument(outcome))
        }
        EngineCommand::SetBaseline {
            body,
            source_identity,
            description,
        } => {
            let row = set_baseline(conn, &body, &source_identity, description.as_deref())?;
            Ok(EngineCommandResult::SetBaseline(row))
        }
        EngineCommand::ShowBaseline { source_identity } => {
            let row = show_baseline(conn, &source_identity)?;
            Ok(EngineCommandResult::ShowBaseline(row))
        }
    }
}
