//! Rejected submissions over in-memory adapters.

use super::helpers::{Stack, run_at_in};
use chrono::{DateTime, Duration, Utc};
use eyre::{bail, ensure};
use fermata::task::{
    ports::TaskRepository,
    services::{SubmissionError, SubmitTaskRequest},
};
use rstest::rstest;
use serde_json::json;

async fn assert_nothing_recorded(stack: &Stack) -> Result<(), eyre::Report> {
    ensure!(stack.trigger.schedules()?.is_empty());
    ensure!(
        stack
            .repository
            .find_scheduled_before(DateTime::<Utc>::MAX_UTC)
            .await?
            .is_empty()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_action_is_rejected() -> Result<(), eyre::Report> {
    let stack = Stack::with_webhook_status(200)?;
    let request = SubmitTaskRequest::default()
        .with_payload(json!({ "url": "https://hooks.example.test" }))
        .with_run_at(run_at_in(Duration::minutes(1)));

    let Err(err) = stack.submission.submit(request).await else {
        bail!("submission without an action should fail");
    };
    ensure!(err.is_validation());
    ensure!(err.to_string() == "Missing required fields (action)");
    assert_nothing_recorded(&stack).await
}

#[rstest]
#[case(json!({ "action": "webhook", "payload": {}, "runAt": "soon" }))]
#[case(json!({ "action": "webhook", "payload": [1], "runAt": "2030-01-01T00:00:00Z" }))]
#[case(json!({ "action": " ", "payload": {}, "runAt": "2030-01-01T00:00:00Z" }))]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_requests_store_nothing(
    #[case] body: serde_json::Value,
) -> Result<(), eyre::Report> {
    let stack = Stack::with_webhook_status(200)?;
    let request: SubmitTaskRequest = serde_json::from_value(body)?;

    let result = stack.submission.submit(request).await;
    ensure!(matches!(
        result,
        Err(SubmissionError::MissingFields(_) | SubmissionError::Validation(_))
    ));
    assert_nothing_recorded(&stack).await
}
