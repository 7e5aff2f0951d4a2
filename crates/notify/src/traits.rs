//! Notifier trait definition and shared error types.

use pooltask_core::TaskId;
use serde::{Deserialize, Serialize};

/// Errors that can occur during callback delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("callback receiver returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("callback channel closed")]
    Closed,
}

/// Body of the completion callback: `{"taskID": "...", "success": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackPayload {
    #[serde(rename = "taskID")]
    pub task_id: TaskId,
    pub success: bool,
}

impl CallbackPayload {
    pub fn new(task_id: TaskId, success: bool) -> Self {
        Self { task_id, success }
    }
}

/// Trait for callback delivery implementations.
///
/// A single call is a single delivery attempt. Callers decide what to do
/// with the error; implementations must not retry on their own.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one completion callback.
    async fn notify(&self, payload: &CallbackPayload) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "webhook").
    fn channel_name(&self) -> &str;
}
