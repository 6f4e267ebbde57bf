//! The console context: both controllers plus the shared ledger and stats.
//!
//! This is the single object the API and CLI talk to. It is cheap to clone;
//! all clones share the same state.

use crate::config::WorkflowsConfig;
use crate::controller::{ControllerState, Sinks, TriggerController, TriggerError};
use crate::dispatch::{Dispatcher, HttpDispatcher};
use crate::execution::{ExecutionRecord, Ledger, Stats, StatsAggregator};
use crate::metrics::{MetricsSource, SimulatedMetrics};
use crate::workflow::WorkflowKind;
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SystemStatus {
    Running,
    Standby,
}

#[derive(Clone)]
pub struct Console {
    main: Arc<TriggerController>,
    sheets: Arc<TriggerController>,
    ledger: Arc<Ledger>,
    stats: Arc<StatsAggregator>,
}

impl Console {
    pub fn new(
        cooldown: Duration,
        dispatcher: Arc<dyn Dispatcher>,
        metrics: Arc<dyn MetricsSource>,
    ) -> Self {
        let sinks = Sinks {
            dispatcher,
            metrics,
            ledger: Arc::new(Ledger::new()),
            stats: Arc::new(StatsAggregator::new()),
        };
        Self {
            main: TriggerController::new(WorkflowKind::Main, cooldown, sinks.clone()),
            sheets: TriggerController::new(WorkflowKind::SheetsSub, cooldown, sinks.clone()),
            ledger: sinks.ledger,
            stats: sinks.stats,
        }
    }

    /// Build a console that dispatches over HTTP with simulated run metrics.
    pub async fn from_config(cfg: &WorkflowsConfig) -> Result<Self> {
        let dispatcher = HttpDispatcher::new(cfg.request_timeout())
            .context("failed to build webhook HTTP client")?;
        let console = Self::new(
            cfg.cooldown(),
            Arc::new(dispatcher),
            Arc::new(SimulatedMetrics),
        );
        console
            .set_endpoint(WorkflowKind::Main, &cfg.main_endpoint)
            .await;
        console
            .set_endpoint(WorkflowKind::SheetsSub, &cfg.sheets_endpoint)
            .await;
        Ok(console)
    }

    pub fn controller(&self, kind: WorkflowKind) -> &Arc<TriggerController> {
        match kind {
            WorkflowKind::Main => &self.main,
            WorkflowKind::SheetsSub => &self.sheets,
        }
    }

    pub async fn set_endpoint(&self, kind: WorkflowKind, url: &str) {
        self.controller(kind).set_endpoint(url).await;
    }

    pub async fn clear_endpoint(&self, kind: WorkflowKind) {
        self.controller(kind).clear_endpoint().await;
    }

    pub async fn trigger(&self, kind: WorkflowKind) -> Result<ExecutionRecord, TriggerError> {
        self.controller(kind).trigger().await
    }

    pub async fn state(&self, kind: WorkflowKind) -> ControllerState {
        self.controller(kind).state().await
    }

    /// Retained execution history, newest first.
    pub async fn history(&self) -> Vec<ExecutionRecord> {
        self.ledger.all().await
    }

    pub async fn stats(&self) -> Stats {
        self.stats.snapshot().await
    }

    pub fn system_status(&self) -> SystemStatus {
        if self.main.is_busy() || self.sheets.is_busy() {
            SystemStatus::Running
        } else {
            SystemStatus::Standby
        }
    }
}
