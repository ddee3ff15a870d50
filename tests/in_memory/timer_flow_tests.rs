//! The tokio dispatch trigger delivering to the execution service.

use super::helpers::{Engine, webhook_request};
use chrono::Duration;
use eyre::ensure;
use fermata::{
    action::{
        adapters::memory::RecordingWebhookTransport,
        domain::WEBHOOK_ACTION,
        services::{ActionRegistry, WebhookHandler},
    },
    task::{
        adapters::{memory::InMemoryTaskRepository, timer::TokioDispatchTrigger},
        domain::{ActionTag, TaskId, TaskStatus},
        ports::TaskRepository,
        services::{TaskExecutionService, TaskSubmissionService},
    },
};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration as StdDuration;

async fn wait_for_status(
    repository: &InMemoryTaskRepository,
    task_id: TaskId,
    expected: TaskStatus,
) -> Result<(), eyre::Report> {
    let poll = async {
        loop {
            let status = repository.find_by_id(task_id).await?.map(|task| task.status());
            if status == Some(expected) {
                return Ok::<(), eyre::Report>(());
            }
            tokio::time::sleep(StdDuration::from_millis(10)).await;
        }
    };
    tokio::time::timeout(StdDuration::from_secs(5), poll).await?
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn past_due_task_fires_and_completes() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let transport = Arc::new(RecordingWebhookTransport::default());
    let clock = Arc::new(DefaultClock);
    let mut registry = ActionRegistry::new();
    registry.register(
        ActionTag::new(WEBHOOK_ACTION)?,
        Arc::new(WebhookHandler::new(Arc::clone(&transport))),
    )?;

    let engine: Arc<Engine> = Arc::new(TaskExecutionService::new(
        Arc::clone(&repository),
        Arc::new(registry),
        Arc::clone(&clock),
    ));
    let trigger = Arc::new(TokioDispatchTrigger::new(engine, Arc::clone(&clock)));
    let submission = TaskSubmissionService::new(Arc::clone(&repository), trigger, clock);

    let task = submission
        .submit(webhook_request(
            "https://hooks.example.test/now",
            json!({ "ping": true }),
            -Duration::seconds(1),
        ))
        .await?;

    wait_for_status(&repository, task.id(), TaskStatus::Completed).await?;
    ensure!(transport.requests()?.len() == 1);
    Ok(())
}
