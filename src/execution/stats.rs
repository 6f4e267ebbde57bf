use super::{ExecutionRecord, ExecutionStatus};
use serde::Serialize;
use tokio::sync::RwLock;

/// Lifetime run totals since process start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_runs: u64,
    pub successful_runs: u64,
    pub failed_runs: u64,
    /// Floored running mean, failed runs included.
    pub avg_duration_secs: u64,
}

impl Stats {
    /// Fold one record into the totals.
    ///
    /// The mean is carried forward incrementally and floored at every step,
    /// so it can drift below the exact mean over many runs.
    pub fn apply(&self, record: &ExecutionRecord) -> Stats {
        let total_runs = self.total_runs + 1;
        let (ok, failed) = match record.status {
            ExecutionStatus::Success => (1, 0),
            ExecutionStatus::Failed => (0, 1),
        };
        let weighted = self.avg_duration_secs as u128 * self.total_runs as u128
            + record.duration_secs as u128;
        let avg_duration_secs = (weighted / total_runs as u128) as u64;

        Stats {
            total_runs,
            successful_runs: self.successful_runs + ok,
            failed_runs: self.failed_runs + failed,
            avg_duration_secs,
        }
    }

    /// Percentage of successful runs, 0 when nothing has run yet.
    pub fn success_rate(&self) -> f64 {
        if self.total_runs == 0 {
            return 0.0;
        }
        self.successful_runs as f64 * 100.0 / self.total_runs as f64
    }
}

/// Shared aggregator fed by both controllers.
#[derive(Default)]
pub struct StatsAggregator {
    current: RwLock<Stats>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, execution: &ExecutionRecord) {
        let mut current = self.current.write().await;
        *current = current.apply(execution);
    }

    pub async fn snapshot(&self) -> Stats {
        *self.current.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::tests::record;
    use crate::workflow::WorkflowKind;

    #[test]
    fn test_floored_running_mean() {
        let s = Stats::default()
            .apply(&record(WorkflowKind::Main, ExecutionStatus::Success, 7))
            .apply(&record(WorkflowKind::Main, ExecutionStatus::Success, 8));
        // (7 * 1 + 8) / 2 = 7.5 -> 7
        assert_eq!(s.avg_duration_secs, 7);

        let s = s.apply(&record(WorkflowKind::SheetsSub, ExecutionStatus::Failed, 0));
        // (7 * 2 + 0) / 3 = 4.66 -> 4
        assert_eq!(s.avg_duration_secs, 4);
        assert_eq!(s.total_runs, 3);
        assert_eq!(s.successful_runs, 2);
        assert_eq!(s.failed_runs, 1);
    }

    #[test]
    fn test_success_rate() {
        assert_eq!(Stats::default().success_rate(), 0.0);
        let s = Stats::default()
            .apply(&record(WorkflowKind::Main, ExecutionStatus::Success, 5))
            .apply(&record(WorkflowKind::Main, ExecutionStatus::Failed, 0));
        assert!((s.success_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_totals_stay_consistent_and_monotonic() {
        let agg = StatsAggregator::new();
        let mut prev = agg.snapshot().await;
        assert_eq!(prev, Stats::default());

        for i in 0..30u64 {
            let status = if i % 3 == 0 {
                ExecutionStatus::Failed
            } else {
                ExecutionStatus::Success
            };
            agg.record(&record(WorkflowKind::Main, status, i % 11)).await;

            let now = agg.snapshot().await;
            assert_eq!(now.total_runs, now.successful_runs + now.failed_runs);
            assert!(now.total_runs > prev.total_runs);
            assert!(now.successful_runs >= prev.successful_runs);
            assert!(now.failed_runs >= prev.failed_runs);
            prev = now;
        }

        assert_eq!(agg.snapshot().await, agg.snapshot().await);
    }
}
