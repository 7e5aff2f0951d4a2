//! Inbound side of the completion callback, for exercising the receiver locally.

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::Json;
use pooltask_notify::CallbackPayload;
use tracing::info;

use super::{error_response, ApiError};

/// Decode `{taskID, success}` and echo it back.
pub async fn callback(body: Bytes) -> Result<Json<CallbackPayload>, ApiError> {
    let payload: CallbackPayload = serde_json::from_slice(&body)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    info!(task_id = %payload.task_id, success = payload.success, "callback received");
    Ok(Json(payload))
}
