//! Field-level snapshot diffing and change classification.
//!
//! The entry points are [`compute_field_changes`], which compares two
//! normalized field maps, and [`classify_changes`], which turns the
//! differences into typed change events for the history sink.

mod engine;
mod model;

pub use engine::{classify_changes, compute_field_changes};
pub use model::{ChangeEvent, ChangeKind, FieldChange};
