//! Execution entry point invoked by dispatch triggers.

use crate::task::domain::{ExecutionOutcome, TaskId};
use async_trait::async_trait;

/// Entry point that runs a scheduled task.
///
/// Implementations absorb every error into task state; the returned outcome
/// is informational only.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Executes the task with the given identifier.
    async fn execute(&self, task_id: TaskId) -> ExecutionOutcome;
}
