//! Shared handler state.

use crate::task::{
    ports::{DispatchTrigger, TaskExecutor, TaskRepository},
    services::TaskSubmissionService,
};
use mockable::Clock;
use std::sync::Arc;

/// Services shared by every request handler.
pub struct AppState<R, T, C>
where
    R: TaskRepository,
    T: DispatchTrigger,
    C: Clock + Send + Sync,
{
    submission: TaskSubmissionService<R, T, C>,
    executor: Arc<dyn TaskExecutor>,
}

impl<R, T, C> Clone for AppState<R, T, C>
where
    R: TaskRepository,
    T: DispatchTrigger,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            submission: self.submission.clone(),
            executor: Arc::clone(&self.executor),
        }
    }
}

impl<R, T, C> AppState<R, T, C>
where
    R: TaskRepository,
    T: DispatchTrigger,
    C: Clock + Send + Sync,
{
    /// Creates handler state from the submission service and the execution
    /// entry point.
    #[must_use]
    pub const fn new(
        submission: TaskSubmissionService<R, T, C>,
        executor: Arc<dyn TaskExecutor>,
    ) -> Self {
        Self {
            submission,
            executor,
        }
    }

    pub(super) const fn submission(&self) -> &TaskSubmissionService<R, T, C> {
        &self.submission
    }

    pub(super) fn executor(&self) -> &dyn TaskExecutor {
        self.executor.as_ref()
    }
}
