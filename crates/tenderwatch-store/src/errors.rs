//! Error handling for tenderwatch-store
//!
//! Wraps tenderwatch-core IngestError with store-specific helpers

use tenderwatch_core::errors::{IngestError, IngestErrorKind};

/// Result type alias using IngestError
pub type Result<T> = std::result::Result<T, IngestError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> IngestError {
    IngestError::new(IngestErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> IngestError {
    IngestError::new(IngestErrorKind::Internal)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> IngestError {
    IngestError::new(IngestErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> IngestError {
    IngestError::new(IngestErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
