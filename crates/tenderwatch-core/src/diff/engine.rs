//! Change detection engine.
//!
//! Compares the normalized field maps of two consecutive snapshots of the
//! same tender and classifies every difference into typed change events.

use crate::diff::model::{ChangeEvent, ChangeKind, FieldChange};
use std::collections::{BTreeMap, BTreeSet};
use tenderwatch_core_types::schema::{AMENDMENT_FIELDS, F_BID_SUBMISSION_DEADLINE, F_DUE_DATE};

/// Compute the field-level differences between two normalized field maps.
///
/// Iterates the union of field names in deterministic order. A field that
/// is absent (or normalized to empty) on both sides is not a difference; a
/// field present only in the newer map is an addition and is one.
pub fn compute_field_changes(
    older: &BTreeMap<String, String>,
    newer: &BTreeMap<String, String>,
) -> Vec<FieldChange> {
    let fields: BTreeSet<&str> = older
        .keys()
        .chain(newer.keys())
        .map(|s| s.as_str())
        .collect();

    let mut changes = Vec::new();
    for field in fields {
        let old = non_empty(older.get(field));
        let new = non_empty(newer.get(field));
        if old != new {
            changes.push(FieldChange {
                field: field.to_string(),
                old: old.cloned(),
                new: new.cloned(),
            });
        }
    }
    changes
}

/// Empty-string values are the explicit absent marker from normalization.
fn non_empty(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.is_empty())
}

/// Classify field differences into typed change events.
///
/// Fixed precedence:
/// 1. a `bid_submission_deadline` difference produces one
///    [`ChangeKind::BidDeadlineExtension`] event carrying before/after
///    dates; a simultaneous `due_date` difference is folded into its note
/// 2. a `due_date` difference without a deadline difference produces one
///    [`ChangeKind::DueDateExtension`] event
/// 3. differences confined to monetary/scope/descriptive fields merge into
///    one [`ChangeKind::Amendment`] event
/// 4. everything else differing merges into one [`ChangeKind::Other`] event
///
/// Every differing field appears in exactly one emitted event's note; an
/// empty change list yields no events.
pub fn classify_changes(
    tender_ref: &str,
    snapshot_id: &str,
    changes: &[FieldChange],
) -> Vec<ChangeEvent> {
    let deadline = changes
        .iter()
        .find(|c| c.field == F_BID_SUBMISSION_DEADLINE);
    let due = changes.iter().find(|c| c.field == F_DUE_DATE);
    let amendments: Vec<&FieldChange> = changes
        .iter()
        .filter(|c| AMENDMENT_FIELDS.contains(&c.field.as_str()))
        .collect();
    let others: Vec<&FieldChange> = changes
        .iter()
        .filter(|c| {
            c.field != F_BID_SUBMISSION_DEADLINE
                && c.field != F_DUE_DATE
                && !AMENDMENT_FIELDS.contains(&c.field.as_str())
        })
        .collect();

    let mut events = Vec::new();

    if let Some(deadline) = deadline {
        let mut note = format!("Bid submission deadline changed: {}", describe_pair(deadline));
        if let Some(due) = due {
            // A due-date move alongside a deadline move is one corrigendum,
            // not two separate extensions
            note.push_str(&format!("; due date changed: {}", describe_pair(due)));
        }
        events.push(ChangeEvent {
            tender_ref: tender_ref.to_string(),
            kind: ChangeKind::BidDeadlineExtension,
            note,
            before_date: deadline.old.clone(),
            after_date: deadline.new.clone(),
            snapshot_id: snapshot_id.to_string(),
        });
    } else if let Some(due) = due {
        events.push(ChangeEvent {
            tender_ref: tender_ref.to_string(),
            kind: ChangeKind::DueDateExtension,
            note: format!("Due date changed: {}", describe_pair(due)),
            before_date: due.old.clone(),
            after_date: due.new.clone(),
            snapshot_id: snapshot_id.to_string(),
        });
    }

    if !amendments.is_empty() {
        events.push(ChangeEvent {
            tender_ref: tender_ref.to_string(),
            kind: ChangeKind::Amendment,
            note: format!("Amendment: {}", describe_list(&amendments)),
            before_date: None,
            after_date: None,
            snapshot_id: snapshot_id.to_string(),
        });
    }

    if !others.is_empty() {
        events.push(ChangeEvent {
            tender_ref: tender_ref.to_string(),
            kind: ChangeKind::Other,
            note: format!("Fields changed: {}", describe_list(&others)),
            before_date: None,
            after_date: None,
            snapshot_id: snapshot_id.to_string(),
        });
    }

    events
}

fn describe_pair(change: &FieldChange) -> String {
    format!(
        "{} -> {}",
        change.old.as_deref().unwrap_or("(not set)"),
        change.new.as_deref().unwrap_or("(removed)")
    )
}

fn describe_list(changes: &[&FieldChange]) -> String {
    changes
        .iter()
        .map(|c| format!("{}: {}", c.field, describe_pair(c)))
        .collect::<Vec<_>>()
        .join("; ")
}
