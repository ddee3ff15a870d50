//! Execution engine driving a task through `scheduled -> running -> terminal`.

use crate::action::{domain::ActionFailure, services::ActionRegistry};
use crate::task::{
    domain::{ExecutionOutcome, Task, TaskDomainError, TaskId, TaskStatus},
    ports::{TaskExecutor, TaskRepository, TaskRepositoryError},
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Infrastructure failures that stop an execution part-way.
#[derive(Debug, Error)]
enum ExecutionError {
    #[error("failed to load task: {0}")]
    Load(TaskRepositoryError),

    #[error("failed to claim task: {0}")]
    Claim(TaskRepositoryError),

    #[error("failed to record task outcome: {0}")]
    Record(TaskRepositoryError),

    #[error(transparent)]
    Domain(#[from] TaskDomainError),
}

impl ExecutionError {
    /// Whether this invocation may hold the claim on the task.
    const fn may_hold_claim(&self) -> bool {
        !matches!(self, Self::Load(_))
    }
}

/// Runs the action for a task and records its terminal status.
///
/// Every status write is conditional on the status this invocation last
/// observed, so duplicate or concurrent deliveries of the same task run the
/// action at most once.
pub struct TaskExecutionService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    actions: Arc<ActionRegistry>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskExecutionService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            actions: Arc::clone(&self.actions),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskExecutionService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new execution service.
    #[must_use]
    pub const fn new(repository: Arc<R>, actions: Arc<ActionRegistry>, clock: Arc<C>) -> Self {
        Self {
            repository,
            actions,
            clock,
        }
    }

    /// Executes the task identified by `task_id`.
    ///
    /// Never returns an error: infrastructure failures yield
    /// [`ExecutionOutcome::Aborted`] after one best-effort attempt to mark a
    /// claimed task failed.
    pub async fn execute(&self, task_id: TaskId) -> ExecutionOutcome {
        match self.run(task_id).await {
            Ok(outcome) => outcome,
            Err(err) => self.abort(task_id, &err).await,
        }
    }

    async fn run(&self, task_id: TaskId) -> Result<ExecutionOutcome, ExecutionError> {
        let Some(mut task) = self
            .repository
            .find_by_id(task_id)
            .await
            .map_err(ExecutionError::Load)?
        else {
            warn!(%task_id, "task not found; nothing to execute");
            return Ok(ExecutionOutcome::NotFound);
        };

        if task.status() != TaskStatus::Scheduled {
            warn!(%task_id, status = %task.status(), "task already claimed; skipping");
            return Ok(ExecutionOutcome::AlreadyClaimed {
                status: task.status(),
            });
        }

        task.start(&*self.clock)?;
        match self
            .repository
            .update_if_status(&task, TaskStatus::Scheduled)
            .await
        {
            Ok(()) => {}
            Err(TaskRepositoryError::StatusConflict { actual, .. }) => {
                warn!(%task_id, status = %actual, "lost claim race; skipping");
                return Ok(ExecutionOutcome::AlreadyClaimed { status: actual });
            }
            Err(TaskRepositoryError::NotFound(_)) => {
                warn!(%task_id, "task disappeared before claim");
                return Ok(ExecutionOutcome::NotFound);
            }
            Err(err) => return Err(ExecutionError::Claim(err)),
        }
        info!(%task_id, action = %task.action(), "task running");

        match self.dispatch(&task).await {
            Ok(()) => {
                task.complete(&*self.clock)?;
                self.record(&task).await?;
                info!(%task_id, "task completed");
                Ok(ExecutionOutcome::Completed)
            }
            Err(failure) => {
                let message = failure.into_message();
                task.fail(message.clone(), &*self.clock)?;
                self.record(&task).await?;
                warn!(%task_id, error = %message, "task failed");
                Ok(ExecutionOutcome::Failed { message })
            }
        }
    }

    async fn dispatch(&self, task: &Task) -> Result<(), ActionFailure> {
        let Some(handler) = self.actions.resolve(task.action()) else {
            return Err(ActionFailure::new(format!(
                "Unsupported action type: {}",
                task.action()
            )));
        };
        handler.execute(task.payload()).await
    }

    async fn record(&self, task: &Task) -> Result<(), ExecutionError> {
        self.repository
            .update_if_status(task, TaskStatus::Running)
            .await
            .map_err(ExecutionError::Record)
    }

    async fn abort(&self, task_id: TaskId, err: &ExecutionError) -> ExecutionOutcome {
        let message = err.to_string();
        error!(%task_id, error = %message, "task execution aborted");

        if err.may_hold_claim() {
            self.mark_failed(task_id, &message).await;
        }
        ExecutionOutcome::Aborted { message }
    }

    /// Single attempt at `running -> failed`; failures are logged only.
    async fn mark_failed(&self, task_id: TaskId, message: &str) {
        let mut task = match self.repository.find_by_id(task_id).await {
            Ok(Some(task)) => task,
            Ok(None) => return,
            Err(err) => {
                error!(%task_id, error = %err, "could not reload task to mark it failed");
                return;
            }
        };
        if task.status() != TaskStatus::Running {
            return;
        }
        if let Err(err) = task.fail(message, &*self.clock) {
            error!(%task_id, error = %err, "could not mark task failed");
            return;
        }
        match self
            .repository
            .update_if_status(&task, TaskStatus::Running)
            .await
        {
            Ok(()) => warn!(%task_id, "task marked failed after aborted execution"),
            Err(err) => error!(%task_id, error = %err, "could not mark task failed"),
        }
    }
}

#[async_trait]
impl<R, C> TaskExecutor for TaskExecutionService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    async fn execute(&self, task_id: TaskId) -> ExecutionOutcome {
        Self::execute(self, task_id).await
    }
}
