//! Result reported by a single execution invocation.

use super::TaskStatus;
use serde::Serialize;

/// What a single `execute` invocation did to a task.
///
/// Outcomes are informational. The authoritative result is always the
/// persisted task status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The action ran and the task was marked completed.
    Completed,
    /// The action failed and the task was marked failed.
    Failed {
        /// Failure reason recorded on the task.
        message: String,
    },
    /// No task exists for the identifier; nothing was written.
    NotFound,
    /// Another invocation already claimed the task; nothing was executed.
    AlreadyClaimed {
        /// Status observed when the claim was rejected.
        status: TaskStatus,
    },
    /// Execution stopped on an infrastructure error.
    Aborted {
        /// Error description.
        message: String,
    },
}

impl ExecutionOutcome {
    /// Returns `true` when this invocation ran the task's action.
    #[must_use]
    pub const fn ran_action(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed { .. })
    }
}
