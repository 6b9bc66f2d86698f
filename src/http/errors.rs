//! Error-to-response mapping.

use crate::task::services::{QueueError, TaskServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub(super) fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub(super) fn service_error_to_response(err: &TaskServiceError) -> Response {
    match err {
        TaskServiceError::NotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        TaskServiceError::Acquisition(_) => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "acquisition_error",
            err.to_string(),
        ),
        TaskServiceError::Repository(_) | TaskServiceError::ImageRepository(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            err.to_string(),
        ),
    }
}

pub(super) fn queue_error_to_response(err: &QueueError) -> Response {
    json_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "queue_closed",
        err.to_string(),
    )
}
