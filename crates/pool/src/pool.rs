//! The worker pool: registry, admission control and execution behind one lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pooltask_core::config::PoolConfig;
use pooltask_core::{Task, TaskId};
use pooltask_notify::Notifier;
use serde::Serialize;
use tracing::info;

use crate::admission::{self, Admission};
use crate::clock::PoolClock;
use crate::engine;
use crate::error::PoolError;
use crate::registry::Registry;

/// Point-in-time counters, read under the pool lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub active_workers: usize,
    pub max_workers: usize,
    pub total_tasks: usize,
}

pub(crate) struct Shared {
    pub(crate) registry: Mutex<Registry>,
    pub(crate) max_workers: usize,
    pub(crate) clock: PoolClock,
    pub(crate) notifier: Arc<dyn Notifier>,
}

impl Shared {
    /// Every critical section leaves the registry consistent before it can
    /// panic, so a poisoned lock still guards valid state.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Bounded pool of simulated-work slots. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct WorkerPool {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("max_workers", &self.shared.max_workers)
            .field("notifier", &self.shared.notifier.channel_name())
            .finish()
    }
}

impl WorkerPool {
    /// Create a pool with `max_workers` slots reporting completions to `notifier`.
    pub fn new(max_workers: usize, notifier: Arc<dyn Notifier>) -> Result<Self, PoolError> {
        if max_workers == 0 {
            return Err(PoolError::ZeroCapacity);
        }
        Ok(Self {
            shared: Arc::new(Shared {
                registry: Mutex::new(Registry::new()),
                max_workers,
                clock: PoolClock::new(),
                notifier,
            }),
        })
    }

    pub fn from_config(config: &PoolConfig, notifier: Arc<dyn Notifier>) -> Result<Self, PoolError> {
        Self::new(config.max_workers, notifier)
    }

    pub fn max_workers(&self) -> usize {
        self.shared.max_workers
    }

    /// Build a pending task stamped with the pool clock.
    pub fn create_task(&self, execution_time_secs: u64, detail: Option<String>) -> Task {
        Task::new(execution_time_secs, detail, self.shared.clock.now())
    }

    /// Admit `task` if a worker slot is free, otherwise reject it with a retry hint.
    ///
    /// The capacity check, slot reservation, registry insert and the
    /// Pending → Executing transition happen in one critical section.
    /// An admitted task is then run on its own Tokio task, so this must be
    /// called from within a Tokio runtime. Rejected tasks are not retained.
    pub fn try_admit(&self, task: Task) -> Result<Admission, PoolError> {
        let clock = self.shared.clock;
        let (task_id, deadline, active) = {
            let mut registry = self.shared.lock();
            let now = clock.instant();

            if let Some(retry_after_secs) =
                admission::check_capacity(&registry, self.shared.max_workers, now)?
            {
                info!(
                    task_id = %task.id(),
                    retry_after_secs,
                    max_workers = self.shared.max_workers,
                    "pool saturated, task rejected"
                );
                return Ok(Admission::Rejected { retry_after_secs });
            }

            let deadline = now.checked_add(task.execution_time()).ok_or_else(|| {
                PoolError::DurationTooLarge {
                    id: task.id().clone(),
                    secs: task.execution_time_secs(),
                }
            })?;
            let task_id = registry.insert_started(task, clock.at(now), deadline)?;
            (task_id, deadline, registry.active_workers())
        };
        engine::spawn(Arc::clone(&self.shared), task_id.clone(), deadline);

        info!(
            task_id = %task_id,
            active_workers = active,
            max_workers = self.shared.max_workers,
            "task admitted"
        );
        Ok(Admission::Admitted { task_id })
    }

    /// Owned snapshot of every task, in submission order.
    pub fn list_tasks(&self) -> Vec<Task> {
        self.shared.lock().snapshot()
    }

    pub fn get_task(&self, id: &TaskId) -> Option<Task> {
        self.shared.lock().get(id)
    }

    pub fn stats(&self) -> PoolStats {
        let registry = self.shared.lock();
        PoolStats {
            active_workers: registry.active_workers(),
            max_workers: self.shared.max_workers,
            total_tasks: registry.len(),
        }
    }
}
