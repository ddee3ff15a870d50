//! HTTP surface for task submission, execution, and lookup.
//!
//! Routes:
//!
//! - `POST /tasks` schedules a task
//! - `POST /tasks/execute` runs a task now (the dispatch trigger entry point)
//! - `GET /tasks/{task_id}` returns the task record
//! - `GET /health` reports liveness

mod error;
mod handlers;
mod state;

pub use error::ApiError;
pub use handlers::{ExecuteTaskRequest, ExecuteTaskResponse, SubmitTaskResponse};
pub use state::AppState;

use crate::task::ports::{DispatchTrigger, TaskRepository};
use axum::{
    Router,
    routing::{get, post},
};
use mockable::Clock;

/// Builds the service router over `state`.
pub fn build_router<R, T, C>(state: AppState<R, T, C>) -> Router
where
    R: TaskRepository + 'static,
    T: DispatchTrigger + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route("/tasks", post(handlers::submit_task::<R, T, C>))
        .route("/tasks/execute", post(handlers::execute_task::<R, T, C>))
        .route("/tasks/{task_id}", get(handlers::get_task::<R, T, C>))
        .with_state(state)
}
