//! Change detection output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Event production is deterministic: the same snapshot pair always yields
//! the same events in the same order.

use serde::{Deserialize, Serialize};

/// Classification of a detected difference between two snapshots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The bid submission deadline moved
    BidDeadlineExtension,
    /// A general due date moved (without a submission-deadline change)
    DueDateExtension,
    /// Monetary, scope, or descriptive fields changed
    Amendment,
    /// Any other field difference
    Other,
}

impl ChangeKind {
    /// Stable string form used in the history ledger and the API surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::BidDeadlineExtension => "bid_deadline_extension",
            ChangeKind::DueDateExtension => "due_date_extension",
            ChangeKind::Amendment => "amendment",
            ChangeKind::Other => "other",
        }
    }

    /// Parse the stable string form back into a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bid_deadline_extension" => Some(ChangeKind::BidDeadlineExtension),
            "due_date_extension" => Some(ChangeKind::DueDateExtension),
            "amendment" => Some(ChangeKind::Amendment),
            "other" => Some(ChangeKind::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One differing field between two consecutive snapshots.
///
/// `None` means the field was absent (or normalized to empty) on that side;
/// a field absent in the older snapshot but present in the newer one is an
/// addition and counts as a difference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldChange {
    /// Canonical field name
    pub field: String,
    /// Value in the older snapshot
    pub old: Option<String>,
    /// Value in the newer snapshot
    pub new: Option<String>,
}

/// A typed record describing a difference between two snapshots of the
/// same logical tender.
///
/// References the newer snapshot that triggered it; the older side is
/// implicitly the immediately preceding snapshot by sequence. The detection
/// timestamp is stamped when the event is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Logical tender identifier (business key)
    pub tender_ref: String,
    /// Classified change kind
    pub kind: ChangeKind,
    /// Human-readable description of what changed
    pub note: String,
    /// Previous date value, for date-like changes
    pub before_date: Option<String>,
    /// New date value, for date-like changes
    pub after_date: Option<String>,
    /// The newer snapshot this event was derived from
    pub snapshot_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            ChangeKind::BidDeadlineExtension,
            ChangeKind::DueDateExtension,
            ChangeKind::Amendment,
            ChangeKind::Other,
        ] {
            assert_eq!(ChangeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ChangeKind::parse("corrigendum"), None);
    }

    #[test]
    fn test_kind_serde_uses_snake_case() {
        let json = serde_json::to_string(&ChangeKind::BidDeadlineExtension).unwrap();
        assert_eq!(json, "\"bid_deadline_extension\"");
    }
}
