//! Service layer for task submission, lookup, and reconciliation.

use crate::task::{
    domain::{
        ActionTag, Task, TaskDomainError, TaskId, TaskPayload, TriggerSchedule, parse_run_at,
    },
    ports::{DispatchTrigger, DispatchTriggerError, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Request payload for scheduling a task.
///
/// Fields are optional so that missing values are reported together by
/// [`TaskSubmissionService::submit`] rather than by the deserializer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskRequest {
    action: Option<String>,
    payload: Option<Value>,
    run_at: Option<String>,
}

impl SubmitTaskRequest {
    /// Creates a request with all required fields.
    #[must_use]
    pub fn new(action: impl Into<String>, payload: Value, run_at: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            payload: Some(payload),
            run_at: Some(run_at.into()),
        }
    }

    /// Sets the action tag.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Sets the action payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the run-at timestamp string.
    #[must_use]
    pub fn with_run_at(mut self, run_at: impl Into<String>) -> Self {
        self.run_at = Some(run_at.into());
        self
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.action.as_deref().is_none_or(|action| action.trim().is_empty()) {
            missing.push("action");
        }
        if self.payload.as_ref().is_none_or(Value::is_null) {
            missing.push("payload");
        }
        if self.run_at.as_deref().is_none_or(|run_at| run_at.trim().is_empty()) {
            missing.push("runAt");
        }
        missing
    }
}

/// Service-level errors for task submission.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// One or more required fields were absent or empty.
    #[error("Missing required fields ({})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A field was present but invalid.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// The task was stored but its trigger could not be registered.
    ///
    /// The record stays `scheduled` until reconciled.
    #[error("task {task_id} was stored but its trigger was not registered: {source}")]
    Trigger {
        /// Identifier of the orphaned task.
        task_id: TaskId,
        /// Trigger registration failure.
        #[source]
        source: DispatchTriggerError,
    },
}

impl SubmissionError {
    /// Returns `true` for caller mistakes, as opposed to infrastructure
    /// failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::MissingFields(_) | Self::Validation(_))
    }
}

/// Result type for submission service operations.
pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Task submission orchestration service.
pub struct TaskSubmissionService<R, T, C>
where
    R: TaskRepository,
    T: DispatchTrigger,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    trigger: Arc<T>,
    clock: Arc<C>,
}

impl<R, T, C> Clone for TaskSubmissionService<R, T, C>
where
    R: TaskRepository,
    T: DispatchTrigger,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            trigger: Arc::clone(&self.trigger),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, T, C> TaskSubmissionService<R, T, C>
where
    R: TaskRepository,
    T: DispatchTrigger,
    C: Clock + Send + Sync,
{
    /// Creates a new submission service.
    #[must_use]
    pub const fn new(repository: Arc<R>, trigger: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            repository,
            trigger,
            clock,
        }
    }

    /// Validates, persists, and arms a new task.
    ///
    /// The record is stored before the trigger is registered, so a trigger
    /// never fires for a missing task.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::MissingFields`] or
    /// [`SubmissionError::Validation`] for invalid requests (nothing is stored),
    /// [`SubmissionError::Repository`] when the store rejects the record, or
    /// [`SubmissionError::Trigger`] when the record was stored but the
    /// trigger could not be registered.
    pub async fn submit(&self, request: SubmitTaskRequest) -> SubmissionResult<Task> {
        let missing = request.missing_fields();
        if !missing.is_empty() {
            return Err(SubmissionError::MissingFields(missing));
        }

        let SubmitTaskRequest {
            action: raw_action,
            payload: raw_payload,
            run_at: raw_run_at,
        } = request;
        let action = ActionTag::new(raw_action.unwrap_or_default())?;
        let payload = TaskPayload::new(raw_payload.unwrap_or_default())?;
        let run_at = parse_run_at(raw_run_at.as_deref().unwrap_or_default())?;

        let task = Task::schedule(action, payload, run_at, &*self.clock);
        self.repository.store(&task).await?;
        info!(
            task_id = %task.id(),
            action = %task.action(),
            run_at = %task.run_at(),
            "task stored"
        );

        let schedule = TriggerSchedule::for_task(&task);
        if let Err(source) = self.trigger.register(&schedule).await {
            error!(
                task_id = %task.id(),
                schedule = %schedule.name(),
                error = %source,
                "trigger registration failed; task left scheduled"
            );
            return Err(SubmissionError::Trigger {
                task_id: task.id(),
                source,
            });
        }

        info!(
            task_id = %task.id(),
            schedule = %schedule.name(),
            expression = %schedule.expression(),
            "task scheduled"
        );
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when no such task exists.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Repository`] when persistence lookup fails.
    pub async fn find_by_id(&self, task_id: TaskId) -> SubmissionResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Returns tasks still `scheduled` more than `grace` after their
    /// `run_at`.
    ///
    /// These are orphans: their trigger was never registered or never
    /// delivered.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Repository`] when persistence lookup fails.
    pub async fn find_overdue_scheduled(&self, grace: Duration) -> SubmissionResult<Vec<Task>> {
        let cutoff = self.clock.utc() - grace;
        let overdue = self.repository.find_scheduled_before(cutoff).await?;
        for task in &overdue {
            warn!(
                task_id = %task.id(),
                run_at = %task.run_at(),
                "task still scheduled past its run time"
            );
        }
        Ok(overdue)
    }

    /// Registers triggers for every task still `scheduled`.
    ///
    /// Used after a restart when the dispatch trigger does not survive the
    /// process. Schedules that already exist are skipped; redelivery is safe
    /// because execution claims a task at most once. Returns the number of
    /// triggers registered.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Repository`] when the lookup fails, or
    /// [`SubmissionError::Trigger`] for the first registration failure.
    pub async fn rearm_scheduled(&self) -> SubmissionResult<usize> {
        let pending = self
            .repository
            .find_scheduled_before(DateTime::<Utc>::MAX_UTC)
            .await?;

        let mut registered = 0;
        for task in &pending {
            let schedule = TriggerSchedule::for_task(task);
            match self.trigger.register(&schedule).await {
                Ok(()) => registered += 1,
                Err(DispatchTriggerError::DuplicateSchedule(_)) => {}
                Err(source) => {
                    return Err(SubmissionError::Trigger {
                        task_id: task.id(),
                        source,
                    });
                }
            }
        }

        info!(pending = pending.len(), registered, "re-armed scheduled tasks");
        Ok(registered)
    }
}
