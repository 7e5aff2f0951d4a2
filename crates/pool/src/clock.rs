//! Wall-clock timestamps anchored to the Tokio clock.

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

/// Maps Tokio instants onto UTC timestamps.
///
/// The wall clock is read once at construction; every later timestamp is
/// that anchor plus elapsed Tokio time. Deadlines and task timestamps
/// therefore come from the same source, and a paused test clock yields
/// exact, repeatable timestamps.
#[derive(Debug, Clone, Copy)]
pub struct PoolClock {
    origin_utc: DateTime<Utc>,
    origin: Instant,
}

impl PoolClock {
    pub fn new() -> Self {
        Self {
            origin_utc: Utc::now(),
            origin: Instant::now(),
        }
    }

    pub fn instant(&self) -> Instant {
        Instant::now()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.at(Instant::now())
    }

    /// UTC timestamp of `instant`. Instants before the anchor clamp to it.
    pub fn at(&self, instant: Instant) -> DateTime<Utc> {
        let elapsed = instant.saturating_duration_since(self.origin);
        self.origin_utc + TimeDelta::from_std(elapsed).unwrap_or(TimeDelta::zero())
    }
}

impl Default for PoolClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn paused_clock_does_not_drift() {
        let clock = PoolClock::new();
        assert_eq!(clock.now(), clock.now());
    }

    #[tokio::test(start_paused = true)]
    async fn timestamps_follow_tokio_time() {
        let clock = PoolClock::new();
        let before = clock.now();
        tokio::time::advance(Duration::from_millis(2_500)).await;
        assert_eq!(clock.now() - before, TimeDelta::milliseconds(2_500));
    }

    #[tokio::test(start_paused = true)]
    async fn instants_before_origin_clamp_to_origin() {
        let early = Instant::now();
        tokio::time::advance(Duration::from_secs(1)).await;
        let clock = PoolClock::new();
        assert_eq!(clock.at(early), clock.now());
    }
}
