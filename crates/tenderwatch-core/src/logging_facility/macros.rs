//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use tenderwatch_core::log_op_start;
/// log_op_start!("ingest_record");
/// log_op_start!("ingest_record", tender_ref = "TDR-2025-001");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = tenderwatch_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = tenderwatch_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use tenderwatch_core::log_op_end;
/// log_op_end!("ingest_record", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = tenderwatch_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = tenderwatch_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```ignore
/// # use tenderwatch_core::{log_op_error, errors::{IngestError, IngestErrorKind}};
/// let err = IngestError::new(IngestErrorKind::Persistence);
/// log_op_error!("ingest_record", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::IngestError;
        let ingest_err: IngestError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = tenderwatch_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ingest_err.kind(),
            err_code = ingest_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::IngestError;
        let ingest_err: IngestError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = tenderwatch_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ingest_err.kind(),
            err_code = ingest_err.code(),
            $($field)*
        );
    }};
}
