//! Core types shared across TenderWatch facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Schema constants**: Canonical field keys, event names, and the
//!   canonical tender field vocabulary used by normalization and diffing

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
