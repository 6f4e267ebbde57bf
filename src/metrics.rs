//! Source of per-run duration and workload figures.
//!
//! The remote workflows do not report how long they ran or how much they
//! processed, so the default source generates plausible values. A telemetry
//! backed source can replace it without touching the controller, ledger or
//! aggregator.

use crate::execution::ExecutionDetail;
use crate::workflow::WorkflowKind;
use rand::Rng;

/// Branches fanned out by the main workflow on every run.
pub const MAIN_BRANCHES: u32 = 4;

pub trait MetricsSource: Send + Sync {
    /// Elapsed wall-clock seconds for a run that got a response.
    fn duration_secs(&self, kind: WorkflowKind) -> u64;

    /// Workload detail for a run that got a response.
    fn detail(&self, kind: WorkflowKind) -> ExecutionDetail;
}

/// Random figures in the ranges the dashboard has always shown.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedMetrics;

impl MetricsSource for SimulatedMetrics {
    fn duration_secs(&self, kind: WorkflowKind) -> u64 {
        let mut rng = rand::thread_rng();
        match kind {
            WorkflowKind::Main => rng.gen_range(5..=14),
            WorkflowKind::SheetsSub => rng.gen_range(3..=10),
        }
    }

    fn detail(&self, kind: WorkflowKind) -> ExecutionDetail {
        let mut rng = rand::thread_rng();
        match kind {
            WorkflowKind::Main => ExecutionDetail::Main {
                branches: MAIN_BRANCHES,
                messages_processed: rng.gen_range(5..=24),
            },
            WorkflowKind::SheetsSub => ExecutionDetail::SheetsSub {
                rows_processed: rng.gen_range(10..=59),
            },
        }
    }
}
