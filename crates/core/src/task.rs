//! The unit of work accepted by the pool and its lifecycle.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TaskError;

/// Wire format of every task timestamp, e.g. `2024.03.09 17:04:05.000123`.
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M:%S%.6f";

// ── Identity ─────────────────────────────────────────────────────

/// Opaque task identifier: 128 random bits rendered as 32 lowercase hex chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Draw a fresh id from the OS randomness source.
    ///
    /// Panics if the randomness source is exhausted; there is no sensible
    /// recovery for that inside a request.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for TaskId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

// ── Status ───────────────────────────────────────────────────────

/// Lifecycle state. Ordered so that `a < b` means `a` comes earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Executing,
    Finished,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Executing => "executing",
            Self::Finished => "finished",
        };
        f.write_str(s)
    }
}

// ── Task ─────────────────────────────────────────────────────────

/// A "simulate work for N seconds" request and its lifecycle record.
///
/// Identity and duration are fixed at construction. Status only moves
/// forward through [`Task::start`] and [`Task::finish`], each of which sets
/// its timestamp exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "taskID")]
    id: TaskId,
    status: TaskStatus,
    #[serde(rename = "processMeForThisMuchSeconds")]
    execution_time_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(with = "timestamp")]
    created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    executed_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a pending task with a freshly generated id.
    pub fn new(execution_time_secs: u64, detail: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: TaskId::generate(),
            status: TaskStatus::Pending,
            execution_time_secs,
            detail,
            created_at,
            executed_at: None,
            finished_at: None,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn execution_time_secs(&self) -> u64 {
        self.execution_time_secs
    }

    pub fn execution_time(&self) -> Duration {
        Duration::from_secs(self.execution_time_secs)
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        self.executed_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Pending → Executing, stamping `executed_at`.
    pub fn start(&mut self, at: DateTime<Utc>) -> Result<(), TaskError> {
        self.advance(TaskStatus::Pending, TaskStatus::Executing)?;
        self.executed_at = Some(at);
        Ok(())
    }

    /// Executing → Finished, stamping `finished_at`.
    pub fn finish(&mut self, at: DateTime<Utc>) -> Result<(), TaskError> {
        self.advance(TaskStatus::Executing, TaskStatus::Finished)?;
        self.finished_at = Some(at);
        Ok(())
    }

    fn advance(&mut self, expected: TaskStatus, to: TaskStatus) -> Result<(), TaskError> {
        if self.status != expected {
            return Err(TaskError::InvalidTransition {
                id: self.id.to_string(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Serde adapters for [`TIMESTAMP_FORMAT`], interpreted as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&at.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(at: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
            match at {
                Some(at) => super::serialize(at, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapped(#[serde(with = "super")] DateTime<Utc>);

            Ok(Option::<Wrapped>::deserialize(d)?.map(|Wrapped(at)| at))
        }
    }
}
