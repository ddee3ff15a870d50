//! Domain model for deferred task scheduling and execution.
//!
//! The task domain models submission-time validation, the status state
//! machine, and execution outcomes while keeping storage, HTTP and trigger
//! concerns outside of the domain boundary.

mod action;
mod error;
mod ids;
mod outcome;
mod schedule;
mod task;

pub use action::{ActionTag, TaskPayload};
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use outcome::ExecutionOutcome;
pub use schedule::{ScheduleName, TriggerInput, TriggerSchedule, parse_run_at};
pub use task::{PersistedTaskData, Task, TaskStatus};
