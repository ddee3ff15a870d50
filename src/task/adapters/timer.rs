//! In-process dispatch trigger backed by tokio timers.

use async_trait::async_trait;
use mockable::Clock;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

use crate::task::{
    domain::{ScheduleName, TriggerSchedule},
    ports::{DispatchTrigger, DispatchTriggerError, DispatchTriggerResult, TaskExecutor},
};

/// Dispatch trigger that sleeps on a tokio task until `run_at` and then
/// invokes the executor.
///
/// Registrations live only as long as the process. Schedules whose instant
/// has already passed fire immediately. Registration must happen inside a
/// tokio runtime.
pub struct TokioDispatchTrigger<E, C>
where
    E: TaskExecutor + 'static,
    C: Clock + Send + Sync,
{
    executor: Arc<E>,
    clock: Arc<C>,
    registered: Arc<Mutex<HashSet<ScheduleName>>>,
}

impl<E, C> TokioDispatchTrigger<E, C>
where
    E: TaskExecutor + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a trigger that delivers to `executor`.
    #[must_use]
    pub fn new(executor: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            executor,
            clock,
            registered: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    fn delay_until(&self, schedule: &TriggerSchedule) -> Duration {
        (schedule.run_at() - self.clock.utc())
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

#[async_trait]
impl<E, C> DispatchTrigger for TokioDispatchTrigger<E, C>
where
    E: TaskExecutor + 'static,
    C: Clock + Send + Sync,
{
    async fn register(&self, schedule: &TriggerSchedule) -> DispatchTriggerResult<()> {
        {
            let mut registered = self.registered.lock().map_err(|err| {
                DispatchTriggerError::registration(std::io::Error::other(err.to_string()))
            })?;
            if !registered.insert(schedule.name().clone()) {
                return Err(DispatchTriggerError::DuplicateSchedule(
                    schedule.name().clone(),
                ));
            }
        }

        let delay = self.delay_until(schedule);
        let executor = Arc::clone(&self.executor);
        let registered = Arc::clone(&self.registered);
        let name = schedule.name().clone();
        let task_id = schedule.input().task_id;
        debug!(
            schedule = %name,
            expression = %schedule.expression(),
            delay = ?delay,
            "registered one-shot trigger"
        );

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!(schedule = %name, task_id = %task_id, "trigger fired");
            let outcome = executor.execute(task_id).await;
            debug!(schedule = %name, task_id = %task_id, ?outcome, "trigger delivery finished");
            if let Ok(mut names) = registered.lock() {
                names.remove(&name);
            }
        });

        Ok(())
    }
}
