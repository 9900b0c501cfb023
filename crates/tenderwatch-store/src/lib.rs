//! TenderWatch Store - SQLite persistence for the ingestion pipeline
//!
//! Provides:
//! - Connection management ([`db`])
//! - Embedded, checksummed migrations ([`migrations`])
//! - The append-only snapshot ledger with run-scoped dedup ([`snapshot`])
//! - Template fingerprint baselines per source identity ([`baseline`])
//! - The tender history ledger of classified change events ([`history`])

pub mod baseline;
pub mod db;
pub mod errors;
pub mod history;
pub mod migrations;
pub mod snapshot;
