//! Outbound webhook dispatch and outcome classification.

use crate::workflow::WorkflowKind;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

pub mod classify;
pub mod http;

pub use self::http::HttpDispatcher;

/// JSON body posted to a workflow webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerPayload {
    pub trigger: &'static str,
    pub workflow: WorkflowKind,
    pub timestamp: String,
    pub source: &'static str,
}

impl TriggerPayload {
    /// Payload for an operator-initiated run, stamped with the current time.
    pub fn manual(workflow: WorkflowKind) -> Self {
        Self {
            trigger: "manual",
            workflow,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            source: "dashboard",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },

    #[error("{0}")]
    Transport(String),
}

/// Result of a single dispatch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The endpoint answered. `status_ok` is true for any 2xx.
    Responded { status_ok: bool, status_code: u16 },
    /// The call never completed.
    Failed(DispatchError),
}

impl Outcome {
    pub fn from_status(status_code: u16) -> Self {
        Outcome::Responded {
            status_ok: (200..300).contains(&status_code),
            status_code,
        }
    }
}

/// Sends one trigger to one endpoint. Exactly one attempt, no retries.
#[async_trait::async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, endpoint: &str, payload: &TriggerPayload) -> Outcome;
}
