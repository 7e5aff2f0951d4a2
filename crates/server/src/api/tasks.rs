//! Task submission and listing.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use indexmap::IndexMap;
use pooltask_core::{Task, TaskId};
use pooltask_pool::Admission;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::{error_response, ApiError, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(rename = "processMeForThisMuchSeconds")]
    pub execution_time_secs: u64,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    #[serde(rename = "taskID")]
    pub task_id: TaskId,
}

/// All tasks keyed by id in submission order, or `[]` when there are none.
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, ApiError> {
    let tasks = state.pool.list_tasks();
    if tasks.is_empty() {
        return Ok(Json(serde_json::Value::Array(Vec::new())));
    }

    let by_id: IndexMap<TaskId, Task> = tasks
        .into_iter()
        .map(|task| (task.id().clone(), task))
        .collect();
    serde_json::to_value(&by_id)
        .map(Json)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

/// Submit a task. 200 with its id when admitted, 503 with a retry hint
/// (body and `Retry-After` header) when the pool is saturated.
pub async fn create_task(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: CreateTaskRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let task = state.pool.create_task(request.execution_time_secs, request.detail);
    match state.pool.try_admit(task) {
        Ok(Admission::Admitted { task_id }) => Json(CreateTaskResponse { task_id }).into_response(),
        Ok(Admission::Rejected { retry_after_secs }) => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::RETRY_AFTER, retry_after_secs.to_string())],
            Json(ErrorResponse {
                message: format!("Retry-After {retry_after_secs} secs"),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "task admission failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
