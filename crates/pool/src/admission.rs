//! Capacity check and retry hint.

use std::time::Duration;

use pooltask_core::TaskId;
use tokio::time::Instant;

use crate::error::PoolError;
use crate::registry::Registry;

/// Outcome of offering a task to the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The task holds a worker slot and is executing.
    Admitted { task_id: TaskId },
    /// Every slot is taken. Nothing was recorded; resubmit after the hint.
    Rejected { retry_after_secs: u64 },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

/// Decide whether one more task fits.
///
/// Returns `Ok(None)` when a slot is free, or `Ok(Some(secs))` with the
/// time until the soonest in-flight task is due. A saturated pool with an
/// empty in-flight map is reported as [`PoolError::InFlightInconsistency`].
pub(crate) fn check_capacity(
    registry: &Registry,
    max_workers: usize,
    now: Instant,
) -> Result<Option<u64>, PoolError> {
    let active = registry.active_workers();
    if active < max_workers {
        return Ok(None);
    }

    match registry.min_remaining(now) {
        Some(remaining) => Ok(Some(retry_hint_secs(remaining))),
        None => Err(PoolError::InFlightInconsistency {
            active,
            max: max_workers,
        }),
    }
}

/// Whole seconds to wait, rounded up so the hint never undershoots.
pub(crate) fn retry_hint_secs(remaining: Duration) -> u64 {
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pooltask_core::Task;

    use super::*;

    #[test]
    fn free_slot_admits() {
        let registry = Registry::new();
        assert_eq!(check_capacity(&registry, 1, Instant::now()).unwrap(), None);
    }

    #[test]
    fn saturated_pool_reports_soonest_deadline() {
        let mut registry = Registry::new();
        let now = Instant::now();
        for secs in [10, 4] {
            registry
                .insert_started(Task::new(secs, None, Utc::now()), Utc::now(), now + Duration::from_secs(secs))
                .unwrap();
        }
        assert_eq!(check_capacity(&registry, 2, now).unwrap(), Some(4));
        assert_eq!(check_capacity(&registry, 3, now).unwrap(), None);
    }

    #[test]
    fn saturated_pool_with_nothing_in_flight_is_fatal() {
        let mut registry = Registry::new();
        registry.force_active_workers(2);
        match check_capacity(&registry, 2, Instant::now()) {
            Err(PoolError::InFlightInconsistency { active, max }) => {
                assert_eq!((active, max), (2, 2));
            }
            other => panic!("expected InFlightInconsistency, got {other:?}"),
        }
    }

    #[test]
    fn hint_rounds_partial_seconds_up() {
        assert_eq!(retry_hint_secs(Duration::from_secs(10)), 10);
        assert_eq!(retry_hint_secs(Duration::from_millis(5_500)), 6);
        assert_eq!(retry_hint_secs(Duration::from_millis(1)), 1);
        assert_eq!(retry_hint_secs(Duration::ZERO), 0);
    }
}
