//! API route definitions.

use super::error::ApiError;
use super::state::AppState;
use crate::workflow::WorkflowKind;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
        .route("/workflows/{kind}", get(workflow_state))
        .route(
            "/workflows/{kind}/endpoint",
            put(set_endpoint).delete(clear_endpoint),
        )
        .route("/workflows/{kind}/trigger", post(trigger))
        .route("/executions", get(list_executions))
        .route("/stats", get(stats))
}

fn meta() -> Value {
    json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    })
}

async fn health() -> Json<Value> {
    Json(json!({
        "data": {
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION")
        },
        "meta": meta()
    }))
}

async fn status(State(state): State<AppState>) -> Json<Value> {
    let console = &state.console;
    let main = console.state(WorkflowKind::Main).await;
    let sheets = console.state(WorkflowKind::SheetsSub).await;
    Json(json!({
        "data": {
            "system": console.system_status(),
            "workflows": [main, sheets]
        },
        "meta": meta()
    }))
}

async fn workflow_state(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let kind: WorkflowKind = kind.parse()?;
    let workflow = state.console.state(kind).await;
    Ok(Json(json!({ "data": workflow, "meta": meta() })))
}

#[derive(Debug, Deserialize)]
struct EndpointBody {
    url: String,
}

async fn set_endpoint(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(body): Json<EndpointBody>,
) -> Result<Json<Value>, ApiError> {
    let kind: WorkflowKind = kind.parse()?;
    state.console.set_endpoint(kind, &body.url).await;
    let workflow = state.console.state(kind).await;
    Ok(Json(json!({ "data": workflow, "meta": meta() })))
}

async fn clear_endpoint(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let kind: WorkflowKind = kind.parse()?;
    state.console.clear_endpoint(kind).await;
    let workflow = state.console.state(kind).await;
    Ok(Json(json!({ "data": workflow, "meta": meta() })))
}

async fn trigger(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let kind: WorkflowKind = kind.parse()?;
    let record = state.console.trigger(kind).await?;
    Ok(Json(json!({
        "data": record,
        "meta": { "summary": record.summary() }
    })))
}

async fn list_executions(State(state): State<AppState>) -> Json<Value> {
    let history = state.console.history().await;
    let total = history.len();
    Json(json!({ "data": history, "meta": { "total": total } }))
}

async fn stats(State(state): State<AppState>) -> Json<Value> {
    let stats = state.console.stats().await;
    Json(json!({
        "data": {
            "total_runs": stats.total_runs,
            "successful_runs": stats.successful_runs,
            "failed_runs": stats.failed_runs,
            "avg_duration_secs": stats.avg_duration_secs,
            "success_rate": stats.success_rate()
        },
        "meta": meta()
    }))
}
