use crate::controller::TriggerError;
use crate::workflow::ParseWorkflowError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    UnknownWorkflow(#[from] ParseWorkflowError),

    #[error(transparent)]
    Trigger(#[from] TriggerError),

    #[error("not found")]
    NotFound,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::UnknownWorkflow(_) => (StatusCode::NOT_FOUND, "unknown_workflow"),
            ApiError::Trigger(TriggerError::EndpointNotConfigured { .. }) => {
                (StatusCode::BAD_REQUEST, "endpoint_not_configured")
            }
            ApiError::Trigger(TriggerError::Busy { .. }) => (StatusCode::CONFLICT, "busy"),
            ApiError::Trigger(TriggerError::Aborted { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "dispatch_aborted")
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}
