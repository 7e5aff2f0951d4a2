//! Runs admitted tasks to completion and reports them.

use std::sync::Arc;

use pooltask_core::TaskId;
use pooltask_notify::CallbackPayload;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::pool::Shared;

/// Run the task on its own Tokio task. Never cancelled once spawned.
pub(crate) fn spawn(shared: Arc<Shared>, task_id: TaskId, deadline: Instant) {
    tokio::spawn(execute(shared, task_id, deadline));
}

/// Simulate the work, finish the task, then send its one callback.
///
/// The lock is held only for the finish transition; the delay and the
/// callback both run without it.
async fn execute(shared: Arc<Shared>, task_id: TaskId, deadline: Instant) {
    tokio::time::sleep_until(deadline).await;

    // Guard scoped to this block so the future stays Send across the callback.
    let finished = {
        let mut registry = shared.lock();
        let finished_at = shared.clock.now();
        match registry.finish(&task_id, finished_at) {
            Ok(task) => Ok((task, registry.active_workers())),
            Err(e) => Err(e),
        }
    };

    let (task, active) = match finished {
        Ok(done) => done,
        Err(e) => {
            error!(task_id = %task_id, error = %e, "could not finish task");
            return;
        }
    };
    info!(
        task_id = %task_id,
        execution_time_secs = task.execution_time_secs(),
        active_workers = active,
        "task finished"
    );

    let payload = CallbackPayload::new(task_id, true);
    if let Err(e) = shared.notifier.notify(&payload).await {
        warn!(
            task_id = %payload.task_id,
            channel = shared.notifier.channel_name(),
            error = %e,
            "completion callback failed"
        );
    }
}
