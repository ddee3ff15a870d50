//! Shared test helpers for in-memory scheduling integration tests.

use chrono::{Duration, SecondsFormat, Utc};
use fermata::{
    action::{
        adapters::memory::RecordingWebhookTransport,
        domain::WEBHOOK_ACTION,
        services::{ActionRegistry, WebhookHandler},
    },
    task::{
        adapters::memory::{InMemoryTaskRepository, RecordingDispatchTrigger},
        domain::{ActionTag, ExecutionOutcome, Task, TaskId},
        ports::TaskRepository,
        services::{SubmitTaskRequest, TaskExecutionService, TaskSubmissionService},
    },
};
use mockable::DefaultClock;
use serde_json::{Value, json};
use std::sync::Arc;

/// Submission service wired to the recording trigger.
pub type Submission =
    TaskSubmissionService<InMemoryTaskRepository, RecordingDispatchTrigger, DefaultClock>;

/// Execution service over the in-memory repository.
pub type Engine = TaskExecutionService<InMemoryTaskRepository, DefaultClock>;

/// In-memory scheduling stack with inspectable trigger and transport.
pub struct Stack {
    pub repository: Arc<InMemoryTaskRepository>,
    pub trigger: Arc<RecordingDispatchTrigger>,
    pub transport: Arc<RecordingWebhookTransport>,
    pub submission: Submission,
    pub engine: Engine,
}

impl Stack {
    /// Builds a stack whose webhook transport answers with `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the webhook handler cannot be registered.
    pub fn with_webhook_status(status: u16) -> Result<Self, eyre::Report> {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let trigger = Arc::new(RecordingDispatchTrigger::new());
        let transport = Arc::new(RecordingWebhookTransport::responding_with(status));
        let clock = Arc::new(DefaultClock);

        let mut registry = ActionRegistry::new();
        registry.register(
            ActionTag::new(WEBHOOK_ACTION)?,
            Arc::new(WebhookHandler::new(Arc::clone(&transport))),
        )?;

        Ok(Self {
            submission: TaskSubmissionService::new(
                Arc::clone(&repository),
                Arc::clone(&trigger),
                Arc::clone(&clock),
            ),
            engine: TaskExecutionService::new(
                Arc::clone(&repository),
                Arc::new(registry),
                clock,
            ),
            repository,
            trigger,
            transport,
        })
    }

    /// Simulates the dispatch trigger firing for every registered schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the recorded schedules cannot be read.
    pub async fn fire_all(&self) -> Result<Vec<(TaskId, ExecutionOutcome)>, eyre::Report> {
        let mut outcomes = Vec::new();
        for schedule in self.trigger.schedules()? {
            let task_id = schedule.input().task_id;
            outcomes.push((task_id, self.engine.execute(task_id).await));
        }
        Ok(outcomes)
    }

    /// Loads a task that must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if lookup fails or the task is absent.
    pub async fn task(&self, task_id: TaskId) -> Result<Task, eyre::Report> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| eyre::eyre!("task {task_id} should exist"))
    }
}

/// Returns an RFC 3339 timestamp `offset` from now.
#[must_use]
pub fn run_at_in(offset: Duration) -> String {
    (Utc::now() + offset).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Builds a webhook submission posting `data` to `url`.
#[must_use]
pub fn webhook_request(url: &str, data: Value, offset: Duration) -> SubmitTaskRequest {
    SubmitTaskRequest::new(
        WEBHOOK_ACTION,
        json!({ "url": url, "data": data }),
        run_at_in(offset),
    )
}
