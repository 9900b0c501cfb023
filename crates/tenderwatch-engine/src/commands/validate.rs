//! Template fingerprint gate.
//!
//! Validates an inbound document's structural fingerprint against the
//! registered baseline for its source identity before any field content is
//! trusted.

#![allow(clippy::result_large_err)]

use rusqlite::Connection;
use tenderwatch_core::errors::{IngestError, IngestErrorKind};
use tenderwatch_core::fingerprint::{fingerprint_document, hash_prefix};
use tenderwatch_store::baseline;
use tenderwatch_store::errors::Result;

/// Deployment policy for the fingerprint gate.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    /// When true, a source with no registered baseline is rejected instead
    /// of being admitted with a first-contact warning. Stricter deployments
    /// set this to require an explicit baseline before accepting anything.
    pub require_baseline: bool,
}

/// Outcome of a successful gate pass.
#[derive(Debug, Clone)]
pub enum ValidationOutcome {
    /// The document matched the active baseline; `last_validated_at` was
    /// refreshed.
    Validated {
        /// Fingerprint of the validated document
        fingerprint: String,
    },
    /// No baseline is registered for this source yet. Processing proceeds,
    /// but the warning is surfaced for operator visibility.
    FirstContact {
        /// Fingerprint of the admitted document
        fingerprint: String,
        /// Operator-facing warning, carrying the source identity
        warning: String,
    },
}

/// Validate a document's structural fingerprint for a source identity.
///
/// # Errors
///
/// - `TemplateMismatch` — an active baseline exists and the fingerprints
///   differ; the error carries both truncated hashes and the source
///   identity, and processing must stop before any field is trusted
/// - `BaselineRequired` — no baseline exists and
///   [`ValidatorConfig::require_baseline`] is set
/// - `Persistence` — baseline lookup or timestamp refresh failed
pub fn validate_document(
    conn: &Connection,
    body: &str,
    source_identity: &str,
    config: &ValidatorConfig,
) -> Result<ValidationOutcome> {
    let fingerprint = fingerprint_document(body);

    let active = baseline::find_active(conn, source_identity)?;

    let Some(active) = active else {
        if config.require_baseline {
            return Err(IngestError::new(IngestErrorKind::BaselineRequired)
                .with_op("validate_document")
                .with_source_identity(source_identity)
                .with_message(format!(
                    "No template baseline registered for {} and this deployment \
                     requires one before ingesting",
                    source_identity
                )));
        }
        let warning = format!(
            "No template baseline found for {}. First document received - \
             consider setting a baseline.",
            source_identity
        );
        tracing::warn!(
            source_identity = %source_identity,
            fingerprint = %fingerprint,
            "{}", warning
        );
        return Ok(ValidationOutcome::FirstContact {
            fingerprint,
            warning,
        });
    };

    if fingerprint != active.fingerprint {
        return Err(IngestError::new(IngestErrorKind::TemplateMismatch)
            .with_op("validate_document")
            .with_source_identity(source_identity)
            .with_message(format!(
                "Document template structure has changed for {}. \
                 Expected fingerprint: {}..., received: {}.... \
                 Processing stopped before any field was trusted.",
                source_identity,
                hash_prefix(&active.fingerprint),
                hash_prefix(&fingerprint),
            )));
    }

    baseline::touch_validated(conn, &active.id)?;

    tracing::debug!(
        source_identity = %source_identity,
        baseline_id = %active.id,
        "Document template validated"
    );

    Ok(ValidationOutcome::Validated { fingerprint })
}
