//! Application services for task submission and execution.

mod execution;
mod submission;

pub use execution::TaskExecutionService;
pub use submission::{
    SubmissionError, SubmissionResult, SubmitTaskRequest, TaskSubmissionService,
};
