//! Trigger controllers: one per workflow, one dispatch at a time.

pub mod guard;

pub use self::guard::{BusyGuard, BusyPermit, Phase};

use crate::dispatch::classify::classify;
use crate::dispatch::{Dispatcher, Outcome, TriggerPayload};
use crate::execution::{ExecutionRecord, Ledger, StatsAggregator};
use crate::metrics::MetricsSource;
use crate::workflow::WorkflowKind;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum TriggerError {
    #[error("no webhook endpoint configured for {kind}")]
    EndpointNotConfigured { kind: WorkflowKind },

    #[error("{kind} is still running or cooling down")]
    Busy { kind: WorkflowKind },

    #[error("{kind} dispatch task aborted: {reason}")]
    Aborted { kind: WorkflowKind, reason: String },
}

/// Read model of one controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerState {
    pub workflow: WorkflowKind,
    pub busy: bool,
    pub phase: Phase,
    pub last_run: Option<ExecutionRecord>,
    pub webhook_endpoint: String,
}

#[derive(Default)]
struct Slot {
    endpoint: String,
    last_run: Option<ExecutionRecord>,
}

/// Collaborators shared by both controllers.
#[derive(Clone)]
pub struct Sinks {
    pub dispatcher: Arc<dyn Dispatcher>,
    pub metrics: Arc<dyn MetricsSource>,
    pub ledger: Arc<Ledger>,
    pub stats: Arc<StatsAggregator>,
}

pub struct TriggerController {
    kind: WorkflowKind,
    guard: Arc<BusyGuard>,
    slot: RwLock<Slot>,
    sinks: Sinks,
}

impl TriggerController {
    pub fn new(kind: WorkflowKind, cooldown: Duration, sinks: Sinks) -> Arc<Self> {
        Arc::new(Self {
            kind,
            guard: BusyGuard::new(cooldown),
            slot: RwLock::new(Slot::default()),
            sinks,
        })
    }

    pub fn kind(&self) -> WorkflowKind {
        self.kind
    }

    pub fn is_busy(&self) -> bool {
        self.guard.is_busy()
    }

    pub async fn set_endpoint(&self, url: impl Into<String>) {
        let url = url.into();
        info!(workflow = %self.kind, endpoint = %url, "webhook endpoint set");
        self.slot.write().await.endpoint = url;
    }

    pub async fn clear_endpoint(&self) {
        info!(workflow = %self.kind, "webhook endpoint cleared");
        self.slot.write().await.endpoint.clear();
    }

    pub async fn state(&self) -> ControllerState {
        let slot = self.slot.read().await;
        let phase = self.guard.phase();
        ControllerState {
            workflow: self.kind,
            busy: phase != Phase::Idle,
            phase,
            last_run: slot.last_run.clone(),
            webhook_endpoint: slot.endpoint.clone(),
        }
    }

    /// Run one dispatch cycle.
    ///
    /// Rejections (no endpoint, already busy) return before anything is
    /// sent or recorded. Once accepted, the cycle runs on its own task so the
    /// outcome is recorded even if the caller stops waiting.
    pub async fn trigger(self: &Arc<Self>) -> Result<ExecutionRecord, TriggerError> {
        let kind = self.kind;
        let endpoint = self.slot.read().await.endpoint.clone();
        if endpoint.is_empty() {
            warn!(workflow = %kind, "trigger rejected: no webhook endpoint");
            return Err(TriggerError::EndpointNotConfigured { kind });
        }

        let permit = match self.guard.try_acquire() {
            Some(p) => p,
            None => {
                info!(workflow = %kind, phase = ?self.guard.phase(), "trigger rejected: busy");
                return Err(TriggerError::Busy { kind });
            }
        };

        let this = self.clone();
        tokio::spawn(async move { this.run_cycle(&endpoint, permit).await })
            .await
            .map_err(|e| TriggerError::Aborted {
                kind,
                reason: e.to_string(),
            })
    }

    async fn run_cycle(&self, endpoint: &str, permit: BusyPermit) -> ExecutionRecord {
        let kind = self.kind;
        let started_at = Utc::now();
        let payload = TriggerPayload::manual(kind);
        info!(workflow = %kind, %endpoint, "dispatching trigger");

        let outcome = self.sinks.dispatcher.dispatch(endpoint, &payload).await;
        match &outcome {
            Outcome::Responded {
                status_ok: true,
                status_code,
            } => info!(workflow = %kind, status = status_code, "workflow accepted trigger"),
            Outcome::Responded { status_code, .. } => {
                warn!(workflow = %kind, status = status_code, "workflow rejected trigger")
            }
            Outcome::Failed(e) => {
                error!(workflow = %kind, %endpoint, error = %e, "workflow execution failed")
            }
        }

        let record = classify(kind, started_at, &outcome, self.sinks.metrics.as_ref());
        self.slot.write().await.last_run = Some(record.clone());
        self.sinks.ledger.append(record.clone()).await;
        self.sinks.stats.record(&record).await;

        // Busy holds until the run is visible in every read model.
        permit.release_after_cooldown();
        record
    }
}
