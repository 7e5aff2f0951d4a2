//! Canonical task records plus in-flight bookkeeping.
//!
//! Not synchronized on its own: the pool wraps one `Registry` in a single
//! mutex so that the counter and both maps always change together.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use pooltask_core::{Task, TaskId};
use tokio::time::Instant;

use crate::error::PoolError;

#[derive(Debug, Default)]
pub(crate) struct Registry {
    /// Every task ever admitted, in submission order. Never pruned.
    tasks: IndexMap<TaskId, Task>,
    /// Deadline of each executing task.
    in_flight: HashMap<TaskId, Instant>,
    active_workers: usize,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn active_workers(&self) -> usize {
        self.active_workers
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.len()
    }

    pub(crate) fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Shortest time until any in-flight task is due, or `None` when
    /// nothing is in flight.
    pub(crate) fn min_remaining(&self, now: Instant) -> Option<Duration> {
        self.in_flight
            .values()
            .map(|deadline| deadline.saturating_duration_since(now))
            .min()
    }

    /// Start `task` and take one worker slot for it until `deadline`.
    ///
    /// The task is validated before anything is touched, so a failed
    /// insert leaves the registry unchanged.
    pub(crate) fn insert_started(
        &mut self,
        mut task: Task,
        started_at: DateTime<Utc>,
        deadline: Instant,
    ) -> Result<TaskId, PoolError> {
        if self.contains(task.id()) {
            return Err(PoolError::DuplicateTask(task.id().clone()));
        }
        task.start(started_at)?;

        let id = task.id().clone();
        self.in_flight.insert(id.clone(), deadline);
        self.tasks.insert(id.clone(), task);
        self.active_workers += 1;
        Ok(id)
    }

    /// Finish an executing task and release its worker slot.
    pub(crate) fn finish(&mut self, id: &TaskId, finished_at: DateTime<Utc>) -> Result<Task, PoolError> {
        let task = self
            .tasks
            .get_mut(id)
            .ok_or_else(|| PoolError::UnknownTask(id.clone()))?;
        task.finish(finished_at)?;

        self.in_flight.remove(id);
        self.active_workers = self.active_workers.saturating_sub(1);
        Ok(task.clone())
    }

    pub(crate) fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.get(id).cloned()
    }

    /// Owned copies of every record, in submission order.
    pub(crate) fn snapshot(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    #[cfg(test)]
    pub(crate) fn force_active_workers(&mut self, active: usize) {
        self.active_workers = active;
    }
}
