//! Follow-up dispatch interface for work triggered by detected changes.
//!
//! Heavier work downstream of a change event (re-running analysis,
//! notifying reviewers) runs outside the ingestion pipeline. The pipeline
//! calls this seam at most once per recorded event and reports failures
//! back into the history sink instead of rolling the event back.

use thiserror::Error;

use crate::diff::ChangeEvent;

/// Failure surfaced by a dispatcher implementation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No dispatcher is configured for this deployment
    #[error("No follow-up dispatcher configured")]
    Unavailable,
    /// The downstream system rejected or lost the work item
    #[error("Follow-up dispatch failed: {reason}")]
    Failed { reason: String },
}

/// Dispatch follow-up work for a freshly recorded change event.
pub trait FollowUpDispatcher: Send + Sync {
    /// Hand the event to the downstream worker.
    ///
    /// Implementations must not block on the work completing; they enqueue
    /// and return. The pipeline records a returned error on the event row
    /// and continues.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Unavailable`] when no downstream is
    /// configured, or [`DispatchError::Failed`] when enqueueing fails.
    fn dispatch(&self, event: &ChangeEvent) -> Result<(), DispatchError>;
}

/// Noop dispatcher: accepts every event and does nothing.
/// Used as default when no downstream consumer is configured.
pub struct NoopFollowUpDispatcher;

impl FollowUpDispatcher for NoopFollowUpDispatcher {
    fn dispatch(&self, _: &ChangeEvent) -> Result<(), DispatchError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeKind;

    fn sample_event() -> ChangeEvent {
        ChangeEvent {
            tender_ref: "TDR-1".to_string(),
            kind: ChangeKind::Amendment,
            note: "tender_value: 100 -> 200".to_string(),
            before_date: None,
            after_date: None,
            snapshot_id: "snap:1".to_string(),
        }
    }

    #[test]
    fn test_noop_dispatcher_accepts() {
        let dispatcher = NoopFollowUpDispatcher;
        assert!(dispatcher.dispatch(&sample_event()).is_ok());
    }

    #[test]
    fn test_dispatch_error_messages() {
        assert_eq!(
            DispatchError::Unavailable.to_string(),
            "No follow-up dispatcher configured"
        );
        let failed = DispatchError::Failed {
            reason: "queue full".to_string(),
        };
        assert!(failed.to_string().contains("queue full"));
    }
}
