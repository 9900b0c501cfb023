//! TenderWatch Engine - I/O orchestration for the ingestion pipeline
//!
//! Wires the pure core (normalization, fingerprinting, change detection)
//! to the store (snapshot ledger, baselines, history) into the full
//! per-record pipeline: gate → normalize → snapshot → detect → history →
//! dispatch.

pub mod commands;
