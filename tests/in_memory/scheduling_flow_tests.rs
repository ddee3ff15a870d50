//! End-to-end scheduling flows over in-memory adapters.

use super::helpers::{Stack, webhook_request};
use chrono::Duration;
use eyre::ensure;
use fermata::task::{
    domain::{ExecutionOutcome, TaskStatus, TriggerSchedule},
    services::SubmitTaskRequest,
};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scheduled_webhook_runs_to_completion() -> Result<(), eyre::Report> {
    let stack = Stack::with_webhook_status(200)?;
    let request = webhook_request(
        "https://hooks.example.test/orders",
        json!({ "orderId": 42 }),
        Duration::minutes(1),
    );

    let scheduled = stack.submission.submit(request).await?;
    ensure!(scheduled.status() == TaskStatus::Scheduled);
    ensure!(stack.trigger.schedules()? == vec![TriggerSchedule::for_task(&scheduled)]);

    let outcomes = stack.fire_all().await?;
    ensure!(outcomes == vec![(scheduled.id(), ExecutionOutcome::Completed)]);

    let completed = stack.task(scheduled.id()).await?;
    ensure!(completed.status() == TaskStatus::Completed);
    ensure!(completed.error_message().is_none());
    ensure!(completed.updated_at() >= completed.created_at());

    let requests = stack.transport.requests()?;
    ensure!(requests.len() == 1);
    let request = requests
        .first()
        .ok_or_else(|| eyre::eyre!("expected one webhook request"))?;
    ensure!(request.url() == "https://hooks.example.test/orders");
    ensure!(request.body() == &json!({ "orderId": 42 }));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_webhook_records_status_code() -> Result<(), eyre::Report> {
    let stack = Stack::with_webhook_status(500)?;
    let scheduled = stack
        .submission
        .submit(webhook_request(
            "https://hooks.example.test/down",
            json!({}),
            Duration::zero(),
        ))
        .await?;

    stack.fire_all().await?;

    let failed = stack.task(scheduled.id()).await?;
    ensure!(failed.status() == TaskStatus::Failed);
    ensure!(failed.error_message() == Some("Webhook failed with status 500"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn redelivery_after_completion_is_ignored() -> Result<(), eyre::Report> {
    let stack = Stack::with_webhook_status(204)?;
    let scheduled = stack
        .submission
        .submit(webhook_request(
            "https://hooks.example.test/once",
            json!({ "n": 1 }),
            Duration::seconds(30),
        ))
        .await?;

    stack.fire_all().await?;
    let first = stack.task(scheduled.id()).await?;
    let redelivered = stack.fire_all().await?;

    ensure!(
        redelivered
            == vec![(
                scheduled.id(),
                ExecutionOutcome::AlreadyClaimed {
                    status: TaskStatus::Completed
                }
            )]
    );
    ensure!(stack.task(scheduled.id()).await? == first);
    ensure!(stack.transport.requests()?.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_action_is_stored_then_fails() -> Result<(), eyre::Report> {
    let stack = Stack::with_webhook_status(200)?;
    let request = SubmitTaskRequest::new(
        "email",
        json!({ "to": "ops@example.test" }),
        super::helpers::run_at_in(Duration::zero()),
    );
    let scheduled = stack.submission.submit(request).await?;

    stack.fire_all().await?;

    let failed = stack.task(scheduled.id()).await?;
    ensure!(failed.status() == TaskStatus::Failed);
    ensure!(failed.error_message() == Some("Unsupported action type: email"));
    ensure!(stack.transport.requests()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn orphaned_task_is_reported_and_rearmed() -> Result<(), eyre::Report> {
    let stack = Stack::with_webhook_status(200)?;
    stack.trigger.fail_registrations("scheduler unavailable")?;

    let result = stack
        .submission
        .submit(webhook_request(
            "https://hooks.example.test/late",
            json!({}),
            -Duration::minutes(30),
        ))
        .await;
    ensure!(result.is_err());

    let overdue = stack
        .submission
        .find_overdue_scheduled(Duration::minutes(5))
        .await?;
    ensure!(overdue.len() == 1);
    ensure!(stack.trigger.schedules()?.is_empty());
    Ok(())
}
