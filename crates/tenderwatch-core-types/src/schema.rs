//! Canonical schema constants for structured logging, events, and the
//! normalized tender field vocabulary
//!
//! These constants ensure consistency across logging, error reporting,
//! normalization, and change classification.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_TENDER_REF: &str = "tender_ref";
pub const FIELD_RUN_ID: &str = "run_id";
pub const FIELD_SOURCE_IDENTITY: &str = "source_identity";
pub const FIELD_SNAPSHOT_ID: &str = "snapshot_id";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical tender field names: one vocabulary shared by the normalizer,
// the snapshot ledger, and the change detector.
pub const F_TENDER_REF: &str = "tender_ref";
pub const F_TENDER_NAME: &str = "tender_name";
pub const F_COMPANY_NAME: &str = "company_name";
pub const F_TENDER_BRIEF: &str = "tender_brief";
pub const F_LOCATION: &str = "location";
pub const F_PUBLISH_DATE: &str = "publish_date";
pub const F_DUE_DATE: &str = "due_date";
pub const F_BID_SUBMISSION_DEADLINE: &str = "bid_submission_deadline";
pub const F_TENDER_VALUE: &str = "tender_value";
pub const F_EMD: &str = "emd";
pub const F_DOCUMENT_FEES: &str = "document_fees";

/// Fields normalized as dates (output `YYYY-MM-DD` or empty).
pub const DATE_FIELDS: &[&str] = &[F_PUBLISH_DATE, F_DUE_DATE, F_BID_SUBMISSION_DEADLINE];

/// Fields normalized as currency phrases (output base-unit amount).
pub const CURRENCY_FIELDS: &[&str] = &[F_TENDER_VALUE, F_EMD, F_DOCUMENT_FEES];

/// Monetary, scope, and descriptive fields: a difference confined to these
/// classifies as an amendment.
pub const AMENDMENT_FIELDS: &[&str] = &[
    F_TENDER_VALUE,
    F_EMD,
    F_DOCUMENT_FEES,
    F_TENDER_BRIEF,
    F_TENDER_NAME,
    F_COMPANY_NAME,
    F_LOCATION,
];
