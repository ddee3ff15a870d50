//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskRow, TaskStatusChangeset},
    schema::scheduled_tasks,
};
use crate::task::{
    domain::{ActionTag, PersistedTaskData, Task, TaskId, TaskPayload, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Conditional updates are a single `UPDATE ... WHERE status = $expected`
/// statement, so the row-level lock taken by `PostgreSQL` serializes
/// concurrent claims.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(scheduled_tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = scheduled_tasks::table
                .filter(scheduled_tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn update_if_status(
        &self,
        task: &Task,
        expected: TaskStatus,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = TaskStatusChangeset {
            status: task.status().as_str().to_owned(),
            updated_at: task.updated_at(),
            error_message: task.error_message().map(str::to_owned),
        };

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                scheduled_tasks::table
                    .filter(scheduled_tasks::id.eq(task_id.into_inner()))
                    .filter(scheduled_tasks::status.eq(expected.as_str())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if updated > 0 {
                return Ok(());
            }

            let current = scheduled_tasks::table
                .filter(scheduled_tasks::id.eq(task_id.into_inner()))
                .select(scheduled_tasks::status)
                .first::<String>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;

            match current {
                None => Err(TaskRepositoryError::NotFound(task_id)),
                Some(persisted) => {
                    let actual = TaskStatus::try_from(persisted.as_str())
                        .map_err(TaskRepositoryError::persistence)?;
                    Err(TaskRepositoryError::StatusConflict {
                        task_id,
                        expected,
                        actual,
                    })
                }
            }
        })
        .await
    }

    async fn find_scheduled_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = scheduled_tasks::table
                .filter(scheduled_tasks::status.eq(TaskStatus::Scheduled.as_str()))
                .filter(scheduled_tasks::run_at.lt(cutoff))
                .order(scheduled_tasks::run_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        status: task.status().as_str().to_owned(),
        action: task.action().as_str().to_owned(),
        payload: task.payload().as_value().clone(),
        run_at: task.run_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        error_message: task.error_message().map(str::to_owned),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        status: persisted_status,
        action: persisted_action,
        payload: persisted_payload,
        run_at,
        created_at,
        updated_at,
        error_message,
    } = row;

    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let action = ActionTag::new(persisted_action).map_err(TaskRepositoryError::persistence)?;
    let payload =
        TaskPayload::new(persisted_payload).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        status,
        action,
        payload,
        run_at,
        created_at,
        updated_at,
        error_message,
    };
    Task::from_persisted(data).map_err(TaskRepositoryError::persistence)
}
