//! One-shot trigger schedules derived from scheduled tasks.

use super::{Task, TaskDomainError, TaskId};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parses a submission `runAt` value into a UTC instant.
///
/// Any RFC 3339 offset is accepted and normalized to UTC. An ISO-8601
/// timestamp without an offset (`2030-01-01T00:00:00`) is read as UTC.
/// Instants in the past are valid; the trigger fires them immediately.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidRunAt`] when the value is neither form.
pub fn parse_run_at(value: &str) -> Result<DateTime<Utc>, TaskDomainError> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|_| trimmed.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
        .map_err(|_| TaskDomainError::InvalidRunAt(value.to_owned()))
}

/// Unique trigger schedule name derived from a task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleName(String);

impl ScheduleName {
    /// Derives the schedule name for a task (`task-<uuid>`).
    #[must_use]
    pub fn for_task(task_id: TaskId) -> Self {
        Self(format!("task-{task_id}"))
    }

    /// Returns the schedule name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque input delivered to the execution entry point when a trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerInput {
    /// Task to execute.
    pub task_id: TaskId,
}

/// Registration parameters for a one-shot dispatch trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSchedule {
    name: ScheduleName,
    run_at: DateTime<Utc>,
    input: TriggerInput,
}

impl TriggerSchedule {
    /// Builds the trigger schedule for a persisted task.
    #[must_use]
    pub fn for_task(task: &Task) -> Self {
        Self {
            name: ScheduleName::for_task(task.id()),
            run_at: task.run_at(),
            input: TriggerInput { task_id: task.id() },
        }
    }

    /// Returns the unique schedule name.
    #[must_use]
    pub const fn name(&self) -> &ScheduleName {
        &self.name
    }

    /// Returns the instant at which the trigger fires.
    #[must_use]
    pub const fn run_at(&self) -> DateTime<Utc> {
        self.run_at
    }

    /// Returns the input delivered to the executor.
    #[must_use]
    pub const fn input(&self) -> TriggerInput {
        self.input
    }

    /// Returns the one-shot schedule expression, e.g.
    /// `at(2030-01-01T00:00:00)`.
    #[must_use]
    pub fn expression(&self) -> String {
        format!("at({})", self.run_at.format("%Y-%m-%dT%H:%M:%S"))
    }
}
