//! Request handlers.

use super::{ApiError, AppState};
use crate::task::{
    domain::{ExecutionOutcome, Task, TaskId},
    ports::{DispatchTrigger, TaskRepository},
    services::SubmitTaskRequest,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

const SCHEDULED_MESSAGE: &str = "Task scheduled successfully";

/// Response body for a scheduled task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskResponse {
    /// Identifier of the new task.
    pub task_id: TaskId,
    /// Human-readable confirmation.
    pub message: String,
}

/// Request body for the execution entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteTaskRequest {
    /// Identifier of the task to execute.
    pub task_id: Option<String>,
}

/// Response body for the execution entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteTaskResponse {
    /// Identifier of the executed task.
    pub task_id: TaskId,
    /// What this invocation did.
    pub outcome: ExecutionOutcome,
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(super) async fn submit_task<R, T, C>(
    State(state): State<AppState<R, T, C>>,
    body: Result<Json<SubmitTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitTaskResponse>), ApiError>
where
    R: TaskRepository + 'static,
    T: DispatchTrigger + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let task = state
        .submission()
        .submit(request)
        .await
        .map_err(|err| ApiError::from_submission("Failed to schedule task", err))?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitTaskResponse {
            task_id: task.id(),
            message: SCHEDULED_MESSAGE.to_owned(),
        }),
    ))
}

pub(super) async fn execute_task<R, T, C>(
    State(state): State<AppState<R, T, C>>,
    body: Result<Json<ExecuteTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExecuteTaskResponse>), ApiError>
where
    R: TaskRepository + 'static,
    T: DispatchTrigger + 'static,
    C: Clock + Send + Sync + 'static,
{
    let Json(request) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let task_id = request
        .task_id
        .ok_or_else(|| ApiError::BadRequest("Missing required field (taskId)".to_owned()))?
        .parse::<TaskId>()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;

    info!(%task_id, "execution requested");
    let outcome = state.executor().execute(task_id).await;
    Ok((
        StatusCode::ACCEPTED,
        Json(ExecuteTaskResponse { task_id, outcome }),
    ))
}

pub(super) async fn get_task<R, T, C>(
    State(state): State<AppState<R, T, C>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiError>
where
    R: TaskRepository + 'static,
    T: DispatchTrigger + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task_id = raw_id
        .parse::<TaskId>()
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;
    state
        .submission()
        .find_by_id(task_id)
        .await
        .map_err(|err| ApiError::from_submission("Failed to load task", err))?
        .map(Json)
        .ok_or(ApiError::NotFound(task_id))
}
