//! Snapshot ledger operations.
//!
//! [`persist`] decides whether a parsed record becomes a new snapshot row
//! or reuses an existing one (run-scoped dedup); [`query`] provides
//! read-only access ordered by the insertion sequence.

pub mod persist;
pub mod query;

pub use persist::{commit_snapshot, compute_content_digest, NewSnapshot, SnapshotCommitResult};
pub use query::{fetch_previous_snapshot, fetch_snapshot_row, list_snapshot_rows, SnapshotRow};
