//! Task aggregate root and the status state machine.

use super::{ActionTag, ParseTaskStatusError, TaskDomainError, TaskId, TaskPayload};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is persisted and waiting for its trigger.
    Scheduled,
    /// An invocation has claimed the task and is executing its action.
    Running,
    /// The action finished successfully.
    Completed,
    /// The action failed or could not be dispatched.
    Failed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` when no further transitions are defined.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns `true` when `self -> target` is an edge of the state machine.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Scheduled, Self::Running)
                | (Self::Running, Self::Completed | Self::Failed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task aggregate root.
///
/// Serializes to the external record schema (`taskId`, `status`, `action`,
/// `payload`, `runAt`, `createdAt`, `updatedAt`, `errorMessage?`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "taskId")]
    id: TaskId,
    status: TaskStatus,
    action: ActionTag,
    payload: TaskPayload,
    run_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted action tag.
    pub action: ActionTag,
    /// Persisted action payload.
    pub payload: TaskPayload,
    /// Persisted earliest execution instant.
    pub run_at: DateTime<Utc>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted failure cause, if any.
    pub error_message: Option<String>,
}

impl Task {
    /// Creates a newly scheduled task with a fresh identifier.
    #[must_use]
    pub fn schedule(
        action: ActionTag,
        payload: TaskPayload,
        run_at: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            status: TaskStatus::Scheduled,
            action,
            payload,
            run_at,
            created_at: timestamp,
            updated_at: timestamp,
            error_message: None,
        }
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InconsistentErrorMessage`] when the error
    /// message presence disagrees with the status, or
    /// [`TaskDomainError::UpdatedBeforeCreated`] when the timestamps are out of
    /// order.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        let is_failed = data.status == TaskStatus::Failed;
        if is_failed != data.error_message.is_some() {
            return Err(TaskDomainError::InconsistentErrorMessage {
                task_id: data.id,
                status: data.status,
            });
        }
        if data.updated_at < data.created_at {
            return Err(TaskDomainError::UpdatedBeforeCreated(data.id));
        }

        Ok(Self {
            id: data.id,
            status: data.status,
            action: data.action,
            payload: data.payload,
            run_at: data.run_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
            error_message: data.error_message,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the action tag.
    #[must_use]
    pub const fn action(&self) -> &ActionTag {
        &self.action
    }

    /// Returns the action payload.
    #[must_use]
    pub const fn payload(&self) -> &TaskPayload {
        &self.payload
    }

    /// Returns the earliest execution instant.
    #[must_use]
    pub const fn run_at(&self) -> DateTime<Utc> {
        self.run_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the failure cause; present only for failed tasks.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Claims the task for execution (`scheduled -> running`).
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// scheduled.
    pub fn start(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Running, clock)
    }

    /// Marks the action as successful (`running -> completed`).
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// running.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Completed, clock)?;
        self.error_message = None;
        Ok(())
    }

    /// Marks the action as failed (`running -> failed`) with a cause.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// running.
    pub fn fail(
        &mut self,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Failed, clock)?;
        self.error_message = Some(message.into());
        Ok(())
    }

    fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(clock);
        Ok(())
    }

    /// Refreshes `updated_at`, never moving it backwards.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc().max(self.updated_at);
    }
}
