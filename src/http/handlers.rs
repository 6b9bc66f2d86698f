//! Route handlers.

use super::{
    ApiState,
    dto::{CreateTaskBody, CreatedTaskBody, TaskBody},
    errors,
};
use crate::task::{
    domain::TaskId,
    ports::{ImageRepository, SourceResolver, TaskRepository},
    services::CreateTaskRequest,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mockable::Clock;
use tracing::{error, warn};

pub(super) async fn health() -> StatusCode {
    StatusCode::OK
}

pub(super) async fn create_task<R, I, S, C>(
    State(state): State<ApiState<R, I, S, C>>,
    payload: Result<Json<CreateTaskBody>, JsonRejection>,
) -> Response
where
    R: TaskRepository,
    I: ImageRepository,
    S: SourceResolver,
    C: Clock + Send + Sync,
{
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(error = %rejection, "task body rejected");
            return errors::json_error(
                rejection.status(),
                "invalid_body",
                rejection.body_text(),
            );
        }
    };

    let task = match state
        .tasks
        .create_task(CreateTaskRequest::new(body.image_path))
        .await
    {
        Ok(task) => task,
        Err(err) => {
            warn!(error = %err, "task creation rejected");
            return errors::service_error_to_response(&err);
        }
    };

    if let Err(err) = state.queue.enqueue(task.id()) {
        error!(task_id = %task.id(), error = %err, "task created but not enqueued");
        return errors::queue_error_to_response(&err);
    }

    (StatusCode::CREATED, Json(CreatedTaskBody::from(&task))).into_response()
}

pub(super) async fn get_task<R, I, S, C>(
    State(state): State<ApiState<R, I, S, C>>,
    Path(id): Path<String>,
) -> Response
where
    R: TaskRepository,
    I: ImageRepository,
    S: SourceResolver,
    C: Clock + Send + Sync,
{
    let Ok(task_id) = id.parse::<TaskId>() else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_task_id",
            format!("'{id}' is not a task id"),
        );
    };

    match state.tasks.get_task(task_id).await {
        Ok(view) => Json(TaskBody::from(view)).into_response(),
        Err(err) => errors::service_error_to_response(&err),
    }
}
