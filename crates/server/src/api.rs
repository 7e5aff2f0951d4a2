//! HTTP handlers.
//!
//! Every error body uses the `{"Message": "..."}` envelope.

mod callback;
mod health;
mod tasks;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

// ── Shared types ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
}

// ── Re-exports ───────────────────────────────────────────────────

pub use callback::callback;
pub use health::{health, home};
pub use tasks::{create_task, list_tasks};
