//! Dispatch trigger port for one-shot future invocations.

use crate::task::domain::{ScheduleName, TriggerSchedule};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for dispatch trigger operations.
pub type DispatchTriggerResult<T> = Result<T, DispatchTriggerError>;

/// Registrar for time-based invocations of the execution entry point.
///
/// Implementations deliver the schedule input to the executor at or after
/// the scheduled instant, at least once.
#[async_trait]
pub trait DispatchTrigger: Send + Sync {
    /// Registers a one-shot trigger.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchTriggerError::DuplicateSchedule`] when a schedule with
    /// the same name exists, or [`DispatchTriggerError::Registration`] when
    /// the underlying scheduler rejects the request.
    async fn register(&self, schedule: &TriggerSchedule) -> DispatchTriggerResult<()>;
}

/// Errors returned by dispatch trigger adapters.
#[derive(Debug, Clone, Error)]
pub enum DispatchTriggerError {
    /// A schedule with this name is already registered.
    #[error("duplicate schedule: {0}")]
    DuplicateSchedule(ScheduleName),

    /// The scheduler failed to register the trigger.
    #[error("trigger registration failed: {0}")]
    Registration(Arc<dyn std::error::Error + Send + Sync>),
}

impl DispatchTriggerError {
    /// Wraps a scheduler error.
    pub fn registration(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Registration(Arc::new(err))
    }
}
