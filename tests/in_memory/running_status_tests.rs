//! The stored record reads `running` while the action executes.

use super::helpers::run_at_in;
use async_trait::async_trait;
use chrono::Duration;
use eyre::ensure;
use fermata::{
    action::{domain::ActionFailure, ports::ActionHandler, services::ActionRegistry},
    task::{
        adapters::memory::{InMemoryTaskRepository, RecordingDispatchTrigger},
        domain::{ActionTag, ExecutionOutcome, TaskId, TaskPayload, TaskStatus},
        ports::TaskRepository,
        services::{SubmitTaskRequest, TaskExecutionService, TaskSubmissionService},
    },
};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use std::sync::{Arc, Mutex};

const OBSERVE_ACTION: &str = "observe";

/// Handler that reads its own task from the repository mid-execution.
struct StatusObserver {
    repository: Arc<InMemoryTaskRepository>,
    task_id: Mutex<Option<TaskId>>,
    observed: Mutex<Vec<TaskStatus>>,
    result: Result<(), String>,
}

impl StatusObserver {
    fn new(repository: Arc<InMemoryTaskRepository>, result: Result<(), String>) -> Self {
        Self {
            repository,
            task_id: Mutex::new(None),
            observed: Mutex::new(Vec::new()),
            result,
        }
    }

    fn watch(&self, task_id: TaskId) -> eyre::Result<()> {
        let mut watched = self
            .task_id
            .lock()
            .map_err(|err| eyre::eyre!("observer lock poisoned: {err}"))?;
        *watched = Some(task_id);
        Ok(())
    }

    fn observed(&self) -> eyre::Result<Vec<TaskStatus>> {
        self.observed
            .lock()
            .map(|observed| observed.clone())
            .map_err(|err| eyre::eyre!("observer lock poisoned: {err}"))
    }
}

#[async_trait]
impl ActionHandler for StatusObserver {
    async fn execute(&self, _payload: &TaskPayload) -> Result<(), ActionFailure> {
        let task_id = self
            .task_id
            .lock()
            .ok()
            .and_then(|watched| *watched)
            .ok_or_else(|| ActionFailure::new("no task under observation"))?;
        let status = self
            .repository
            .find_by_id(task_id)
            .await
            .map_err(|err| ActionFailure::new(err.to_string()))?
            .map(|task| task.status());
        if let (Some(current), Ok(mut observed)) = (status, self.observed.lock()) {
            observed.push(current);
        }
        self.result.clone().map_err(ActionFailure::new)
    }
}

#[rstest]
#[case(Ok(()), TaskStatus::Completed)]
#[case(Err("downstream rejected".to_owned()), TaskStatus::Failed)]
#[tokio::test(flavor = "multi_thread")]
async fn task_reads_running_while_action_executes(
    #[case] result: Result<(), String>,
    #[case] terminal: TaskStatus,
) -> eyre::Result<()> {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(DefaultClock);
    let observer = Arc::new(StatusObserver::new(Arc::clone(&repository), result));
    let mut registry = ActionRegistry::new();
    registry.register(ActionTag::new(OBSERVE_ACTION)?, Arc::<StatusObserver>::clone(&observer))?;

    let submission = TaskSubmissionService::new(
        Arc::clone(&repository),
        Arc::new(RecordingDispatchTrigger::new()),
        Arc::clone(&clock),
    );
    let engine = TaskExecutionService::new(Arc::clone(&repository), Arc::new(registry), clock);

    let task = submission
        .submit(SubmitTaskRequest::new(
            OBSERVE_ACTION,
            json!({}),
            run_at_in(Duration::minutes(1)),
        ))
        .await?;
    observer.watch(task.id())?;

    let outcome = engine.execute(task.id()).await;
    ensure!(outcome.ran_action(), "unexpected outcome {outcome:?}");
    ensure!(observer.observed()? == vec![TaskStatus::Running]);

    let stored = repository
        .find_by_id(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    ensure!(stored.status() == terminal);
    ensure!(
        matches!(outcome, ExecutionOutcome::Completed) == (terminal == TaskStatus::Completed)
    );
    Ok(())
}
