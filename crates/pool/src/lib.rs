//! Admission-controlled worker pool.
//!
//! A fixed number of task slots guarded by a single lock. Submissions are
//! admitted while a slot is free and rejected with a retry hint otherwise;
//! every admitted task runs for its declared duration on its own Tokio task
//! and triggers exactly one completion callback.

pub mod admission;
pub mod clock;
mod engine;
pub mod error;
pub mod pool;
mod registry;

pub use admission::Admission;
pub use clock::PoolClock;
pub use error::PoolError;
pub use pool::{PoolStats, WorkerPool};
