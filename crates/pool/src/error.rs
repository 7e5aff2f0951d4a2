//! Pool error types.

use pooltask_core::{TaskError, TaskId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("max_workers must be at least 1")]
    ZeroCapacity,

    #[error("task {0} is already registered")]
    DuplicateTask(TaskId),

    #[error("task {0} is not registered")]
    UnknownTask(TaskId),

    #[error("task {id}: {secs} seconds is too far out to schedule")]
    DurationTooLarge { id: TaskId, secs: u64 },

    /// Saturated pool with nothing in flight: the bookkeeping is broken.
    #[error("pool saturated ({active}/{max} workers) but no task is in flight")]
    InFlightInconsistency { active: usize, max: usize },

    #[error(transparent)]
    Task(#[from] TaskError),
}
