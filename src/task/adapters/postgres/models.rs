//! Diesel row models for task persistence.

use super::schema::scheduled_tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = scheduled_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Action tag.
    pub action: String,
    /// Payload JSON object.
    pub payload: Value,
    /// Earliest execution instant.
    pub run_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Failure cause.
    pub error_message: Option<String>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = scheduled_tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Action tag.
    pub action: String,
    /// Payload JSON object.
    pub payload: Value,
    /// Earliest execution instant.
    pub run_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Failure cause.
    pub error_message: Option<String>,
}

/// Changeset applied by status transitions.
///
/// Identity, action, payload and run-at columns are immutable after insert.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = scheduled_tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskStatusChangeset {
    /// New lifecycle status.
    pub status: String,
    /// New update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Failure cause; cleared unless the task failed.
    pub error_message: Option<String>,
}
