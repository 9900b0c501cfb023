//! TenderWatch Core - ingestion-trust and change-detection kernel
//!
//! This crate provides the pure (no-I/O) building blocks of the tender
//! ingestion pipeline:
//! - Lenient normalization of heterogeneous dates and currency phrases
//! - Structural template fingerprinting for inbound documents
//! - Record normalization into the canonical field vocabulary
//! - Field-level snapshot diffing and change-event classification
//! - The follow-up dispatch seam for work triggered by detected changes
//!
//! Persistence lives in `tenderwatch-store`; orchestration in
//! `tenderwatch-engine`.

pub mod diff;
pub mod dispatch;
pub mod errors;
pub mod fingerprint;
pub mod logging_facility;
pub mod normalize;
pub mod record;

// Re-export commonly used types
pub use diff::{ChangeEvent, ChangeKind, FieldChange};
pub use dispatch::{FollowUpDispatcher, NoopFollowUpDispatcher};
pub use errors::{IngestError, IngestErrorKind, Result};
pub use record::RawTenderRecord;
