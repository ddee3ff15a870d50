//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not a valid UUID.
    #[error("invalid task identifier '{0}', expected a UUID")]
    InvalidTaskId(String),

    /// The action tag is empty after trimming.
    #[error("action must not be empty")]
    EmptyActionTag,

    /// The action tag exceeds the persisted column width.
    #[error("action '{0}' exceeds 100 characters")]
    ActionTagTooLong(String),

    /// The payload is not a JSON object.
    #[error("payload must be a JSON object")]
    PayloadNotObject,

    /// The run-at timestamp is not RFC 3339.
    #[error("invalid runAt '{0}', expected an ISO-8601 timestamp")]
    InvalidRunAt(String),

    /// The requested status transition is not permitted.
    #[error("task {task_id} cannot transition from {from} to {to}")]
    InvalidStateTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Status the task currently holds.
        from: TaskStatus,
        /// Status that was requested.
        to: TaskStatus,
    },

    /// A persisted record carries an error message without being failed, or
    /// is failed without an error message.
    #[error("task {task_id} has inconsistent error message for status {status}")]
    InconsistentErrorMessage {
        /// Task whose record is inconsistent.
        task_id: TaskId,
        /// Persisted status.
        status: TaskStatus,
    },

    /// A persisted record was updated before it was created.
    #[error("task {0} has updatedAt earlier than createdAt")]
    UpdatedBeforeCreated(TaskId),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
