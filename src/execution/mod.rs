//! Execution records, the bounded history ledger, and run statistics.

pub mod ledger;
pub mod stats;

pub use self::ledger::Ledger;
pub use self::stats::{Stats, StatsAggregator};

use crate::workflow::WorkflowKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Immutable outcome of one trigger attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRecord {
    pub id: Uuid,
    pub workflow: WorkflowKind,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    pub duration_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ExecutionDetail>,
    /// Set only when the call itself failed (transport fault).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failed,
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionStatus::Success => write!(f, "SUCCESS"),
            ExecutionStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Workflow-specific payload attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExecutionDetail {
    Main {
        branches: u32,
        messages_processed: u32,
    },
    SheetsSub {
        rows_processed: u32,
    },
}

impl ExecutionRecord {
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    /// One-line description for history listings.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        match self.detail {
            Some(ExecutionDetail::Main {
                branches,
                messages_processed,
            }) => {
                parts.push(format!("{} branches processed", branches));
                parts.push(format!("{} messages", messages_processed));
            }
            Some(ExecutionDetail::SheetsSub { rows_processed }) => {
                parts.push(format!("{} rows processed", rows_processed));
            }
            None => {}
        }
        if let Some(err) = &self.error_message {
            parts.push(format!("Error: {}", err));
        }
        parts.join(" • ")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(
        workflow: WorkflowKind,
        status: ExecutionStatus,
        duration_secs: u64,
    ) -> ExecutionRecord {
        ExecutionRecord {
            id: Uuid::now_v7(),
            workflow,
            status,
            started_at: Utc::now(),
            duration_secs,
            detail: None,
            error_message: None,
        }
    }

    #[test]
    fn test_summary_main() {
        let mut r = record(WorkflowKind::Main, ExecutionStatus::Success, 7);
        r.detail = Some(ExecutionDetail::Main {
            branches: 4,
            messages_processed: 12,
        });
        assert_eq!(r.summary(), "4 branches processed • 12 messages");
    }

    #[test]
    fn test_summary_transport_fault() {
        let mut r = record(WorkflowKind::SheetsSub, ExecutionStatus::Failed, 0);
        r.error_message = Some("connection refused".to_string());
        assert_eq!(r.summary(), "Error: connection refused");
    }

    #[test]
    fn test_serialized_shape() {
        let mut r = record(WorkflowKind::SheetsSub, ExecutionStatus::Success, 4);
        r.detail = Some(ExecutionDetail::SheetsSub { rows_processed: 31 });
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["workflow"], "google_sheets");
        assert_eq!(json["status"], "success");
        assert_eq!(json["detail"]["rows_processed"], 31);
        assert!(json.get("error_message").is_none());
    }
}
