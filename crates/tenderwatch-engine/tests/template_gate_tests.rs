//! Fingerprint gate integration tests: baseline registration, acceptance,
//! hard rejection, and the first-contact policy.

use rusqlite::Connection;
use tempfile::TempDir;
use tenderwatch_core::dispatch::NoopFollowUpDispatcher;
use tenderwatch_core::errors::IngestErrorKind;
use tenderwatch_core::fingerprint::PREFIX_LEN;
use tenderwatch_core::record::RawTenderRecord;
use tenderwatch_engine::commands::baseline::{set_baseline, show_baseline};
use tenderwatch_engine::commands::ingest::ingest_record;
use tenderwatch_engine::commands::validate::{validate_document, ValidationOutcome, ValidatorConfig};

const SENDER: &str = "tenders@tenderdetail.example.com";

const KNOWN_GOOD: &str = r#"
    <html><body>
      <table class="tender-list">
        <tr class="tender-row">
          <td class="ref">TDR-2025-0042</td>
          <td class="title">Road widening NH-44</td>
          <td class="due">10-01-2025</td>
          <td><a href="https://portal.example.com/tender/42">View</a></td>
        </tr>
      </table>
    </body></html>
"#;

fn setup_db() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let mut conn = Connection::open(&db_path).unwrap();
    tenderwatch_store::migrations::apply_migrations(&mut conn).unwrap();
    (temp_dir, conn)
}

/// Same template, different content and URLs.
fn content_variant() -> String {
    KNOWN_GOOD
        .replace("TDR-2025-0042", "TDR-2025-0107")
        .replace("Road widening NH-44", "Bridge rehabilitation SH-12")
        .replace("10-01-2025", "22-03-2025")
        .replace(
            "https://portal.example.com/tender/42",
            "https://portal.example.com/tender/107?session=9f2",
        )
}

/// Structurally different template (a column was added).
fn structure_variant() -> String {
    KNOWN_GOOD.replace(
        "<td class=\"due\">10-01-2025</td>",
        "<td class=\"due\">10-01-2025</td><td class=\"emd\">50 lakh</td>",
    )
}

#[test]
fn test_first_contact_is_admitted_with_warning() {
    let (_tmp, conn) = setup_db();
    let outcome =
        validate_document(&conn, KNOWN_GOOD, SENDER, &ValidatorConfig::default()).unwrap();

    let ValidationOutcome::FirstContact { warning, fingerprint } = outcome else {
        panic!("Expected FirstContact");
    };
    assert!(warning.contains(SENDER));
    assert_eq!(fingerprint.len(), 64);
}

#[test]
fn test_strict_deployment_requires_baseline() {
    let (_tmp, conn) = setup_db();
    let config = ValidatorConfig {
        require_baseline: true,
    };
    let err = validate_document(&conn, KNOWN_GOOD, SENDER, &config).unwrap_err();
    assert_eq!(err.kind(), IngestErrorKind::BaselineRequired);
    assert_eq!(err.source_identity(), Some(SENDER));
}

#[test]
fn test_matching_document_accepted_and_timestamp_refreshed() {
    let (_tmp, mut conn) = setup_db();
    let baseline = set_baseline(&mut conn, KNOWN_GOOD, SENDER, Some("initial template")).unwrap();

    // Age the validation timestamp so the refresh is observable
    conn.execute(
        "UPDATE template_baselines SET last_validated_at = 0 WHERE id = ?1",
        [&baseline.id],
    )
    .unwrap();

    // Same structure, new content: accepted
    let outcome = validate_document(
        &conn,
        &content_variant(),
        SENDER,
        &ValidatorConfig::default(),
    )
    .unwrap();
    assert!(matches!(outcome, ValidationOutcome::Validated { .. }));

    let refreshed = show_baseline(&conn, SENDER).unwrap().unwrap();
    assert!(refreshed.last_validated_at > 0);
}

#[test]
fn test_structural_drift_is_hard_rejected_with_both_prefixes() {
    let (_tmp, mut conn) = setup_db();
    let baseline = set_baseline(&mut conn, KNOWN_GOOD, SENDER, None).unwrap();

    let err = validate_document(
        &conn,
        &structure_variant(),
        SENDER,
        &ValidatorConfig::default(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), IngestErrorKind::TemplateMismatch);
    assert_eq!(err.source_identity(), Some(SENDER));
    // Both truncated hashes are quoted for operator diagnosis
    assert!(err.message().contains(&baseline.fingerprint[..PREFIX_LEN]));
    let drifted = tenderwatch_core::fingerprint::fingerprint_document(&structure_variant());
    assert!(err.message().contains(&drifted[..PREFIX_LEN]));
}

#[test]
fn test_rejected_document_ingests_nothing() {
    let (_tmp, mut conn) = setup_db();
    set_baseline(&mut conn, KNOWN_GOOD, SENDER, None).unwrap();

    let record = RawTenderRecord {
        source_identity: SENDER.to_string(),
        run_id: "run-1".to_string(),
        tender_ref: "TDR-2025-0042".to_string(),
        fields: [("tender_value".to_string(), "100 crore".to_string())]
            .into_iter()
            .collect(),
        document: Some(structure_variant()),
    };

    let err = ingest_record(
        &mut conn,
        record,
        &ValidatorConfig::default(),
        &NoopFollowUpDispatcher,
    )
    .unwrap_err();
    assert_eq!(err.kind(), IngestErrorKind::TemplateMismatch);

    // Hard stop means no partial ingestion
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM snapshots", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_setting_new_baseline_is_explicit_and_deactivates_prior() {
    let (_tmp, mut conn) = setup_db();
    let first = set_baseline(&mut conn, KNOWN_GOOD, SENDER, None).unwrap();

    // A mismatching document does NOT update the baseline automatically
    let _ = validate_document(
        &conn,
        &structure_variant(),
        SENDER,
        &ValidatorConfig::default(),
    )
    .unwrap_err();
    assert_eq!(
        show_baseline(&conn, SENDER).unwrap().unwrap().fingerprint,
        first.fingerprint
    );

    // The operator explicitly accepts the new template
    let second = set_baseline(&mut conn, &structure_variant(), SENDER, Some("new column")).unwrap();
    assert_ne!(first.fingerprint, second.fingerprint);
    assert_eq!(
        show_baseline(&conn, SENDER).unwrap().unwrap().fingerprint,
        second.fingerprint
    );

    // And the previously rejected structure now validates
    let outcome = validate_document(
        &conn,
        &structure_variant(),
        SENDER,
        &ValidatorConfig::default(),
    )
    .unwrap();
    assert!(matches!(outcome, ValidationOutcome::Validated { .. }));
}
