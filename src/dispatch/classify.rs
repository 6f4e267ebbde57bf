//! Turns a dispatch outcome into an execution record.

use super::Outcome;
use crate::execution::{ExecutionRecord, ExecutionStatus};
use crate::metrics::MetricsSource;
use crate::workflow::WorkflowKind;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub fn classify(
    kind: WorkflowKind,
    started_at: DateTime<Utc>,
    outcome: &Outcome,
    metrics: &dyn MetricsSource,
) -> ExecutionRecord {
    let (status, duration_secs, detail, error_message) = match outcome {
        Outcome::Responded { status_ok, .. } => {
            let status = if *status_ok {
                ExecutionStatus::Success
            } else {
                ExecutionStatus::Failed
            };
            (
                status,
                metrics.duration_secs(kind),
                Some(metrics.detail(kind)),
                None,
            )
        }
        Outcome::Failed(err) => (ExecutionStatus::Failed, 0, None, Some(err.to_string())),
    };

    ExecutionRecord {
        id: Uuid::now_v7(),
        workflow: kind,
        status,
        started_at,
        duration_secs,
        detail,
        error_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchError;
    use crate::execution::ExecutionDetail;

    struct Fixed;

    impl MetricsSource for Fixed {
        fn duration_secs(&self, _kind: WorkflowKind) -> u64 {
            9
        }

        fn detail(&self, kind: WorkflowKind) -> ExecutionDetail {
            match kind {
                WorkflowKind::Main => ExecutionDetail::Main {
                    branches: 4,
                    messages_processed: 11,
                },
                WorkflowKind::SheetsSub => ExecutionDetail::SheetsSub { rows_processed: 20 },
            }
        }
    }

    #[test]
    fn test_ok_response_is_success() {
        let r = classify(
            WorkflowKind::Main,
            Utc::now(),
            &Outcome::from_status(200),
            &Fixed,
        );
        assert_eq!(r.status, ExecutionStatus::Success);
        assert_eq!(r.duration_secs, 9);
        assert_eq!(
            r.detail,
            Some(ExecutionDetail::Main {
                branches: 4,
                messages_processed: 11
            })
        );
        assert!(r.error_message.is_none());
    }

    #[test]
    fn test_rejected_response_has_duration_but_no_message() {
        let r = classify(
            WorkflowKind::SheetsSub,
            Utc::now(),
            &Outcome::from_status(500),
            &Fixed,
        );
        assert_eq!(r.status, ExecutionStatus::Failed);
        assert_eq!(r.duration_secs, 9);
        assert_eq!(
            r.detail,
            Some(ExecutionDetail::SheetsSub { rows_processed: 20 })
        );
        assert!(r.error_message.is_none());
    }

    #[test]
    fn test_transport_fault_carries_message() {
        let outcome = Outcome::Failed(DispatchError::Transport("connection refused".into()));
        let r = classify(WorkflowKind::Main, Utc::now(), &outcome, &Fixed);
        assert_eq!(r.status, ExecutionStatus::Failed);
        assert_eq!(r.duration_secs, 0);
        assert!(r.detail.is_none());
        assert_eq!(r.error_message.as_deref(), Some("connection refused"));
    }
}
