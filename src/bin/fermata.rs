//! `fermata` service binary.
//!
//! Reads configuration from `FERMATA_*` environment variables, reports tasks
//! left overdue by a previous run, re-arms triggers for every task still
//! scheduled, and then serves the HTTP API.

use chrono::Duration;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use fermata::{
    action::{
        adapters::ReqwestWebhookTransport,
        domain::WEBHOOK_ACTION,
        services::{ActionRegistry, WebhookHandler},
    },
    api::{AppState, build_router},
    config::AppConfig,
    task::{
        adapters::{
            memory::InMemoryTaskRepository,
            postgres::{PostgresTaskRepository, TaskPgPool},
            timer::TokioDispatchTrigger,
        },
        domain::ActionTag,
        ports::TaskRepository,
        services::{TaskExecutionService, TaskSubmissionService},
    },
    telemetry::init_tracing,
};
use mockable::DefaultClock;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Scheduled tasks this far past `run_at` at start-up are reported as orphans.
const ORPHAN_GRACE_MINUTES: i64 = 5;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_level())?;

    match config.database_url() {
        Some(url) => {
            let pool = open_pool(url, config.db_pool_size()).await?;
            info!(pool_size = config.db_pool_size(), "using PostgreSQL task store");
            serve(&config, Arc::new(PostgresTaskRepository::new(pool))).await
        }
        None => {
            warn!("FERMATA_DATABASE_URL not set; tasks are kept in memory only");
            serve(&config, Arc::new(InMemoryTaskRepository::new())).await
        }
    }
}

async fn open_pool(url: &str, max_size: u32) -> Result<TaskPgPool, BoxError> {
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = tokio::task::spawn_blocking(move || Pool::builder().max_size(max_size).build(manager))
        .await??;
    Ok(pool)
}

async fn serve<R>(config: &AppConfig, repository: Arc<R>) -> Result<(), BoxError>
where
    R: TaskRepository + 'static,
{
    let clock = Arc::new(DefaultClock);
    let transport = Arc::new(ReqwestWebhookTransport::new(reqwest::Client::new()));

    let mut registry = ActionRegistry::new();
    registry.register(
        ActionTag::new(WEBHOOK_ACTION)?,
        Arc::new(WebhookHandler::new(transport)),
    )?;
    info!(actions = ?registry.registered_tags(), "action registry ready");

    let engine = Arc::new(TaskExecutionService::new(
        Arc::clone(&repository),
        Arc::new(registry),
        Arc::clone(&clock),
    ));
    let trigger = Arc::new(TokioDispatchTrigger::new(
        Arc::clone(&engine),
        Arc::clone(&clock),
    ));
    let submission = TaskSubmissionService::new(repository, trigger, clock);

    let overdue = submission
        .find_overdue_scheduled(Duration::minutes(ORPHAN_GRACE_MINUTES))
        .await?;
    if !overdue.is_empty() {
        warn!(count = overdue.len(), "overdue scheduled tasks found; re-arming");
    }
    submission.rearm_scheduled().await?;

    let app = build_router(AppState::new(submission, engine));
    let listener = TcpListener::bind(config.listen_addr()).await?;
    info!(addr = %listener.local_addr()?, "fermata listening");
    axum::serve(listener, app).await?;
    Ok(())
}
