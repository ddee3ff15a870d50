//! Recording dispatch trigger for tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::TriggerSchedule,
    ports::{DispatchTrigger, DispatchTriggerError, DispatchTriggerResult},
};

/// Dispatch trigger that records registrations instead of firing them.
///
/// Tests inspect [`Self::schedules`] and invoke the executor themselves to
/// simulate delivery, including duplicate delivery.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatchTrigger {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    schedules: Vec<TriggerSchedule>,
    failure: Option<String>,
}

impl RecordingDispatchTrigger {
    /// Creates a trigger with no registrations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent registration fail with `message`.
    ///
    /// # Errors
    ///
    /// Returns a registration error when lock acquisition fails.
    pub fn fail_registrations(&self, message: impl Into<String>) -> DispatchTriggerResult<()> {
        let mut state = self.state.write().map_err(|err| registration_error(&err))?;
        state.failure = Some(message.into());
        Ok(())
    }

    /// Returns the schedules registered so far, in registration order.
    ///
    /// # Errors
    ///
    /// Returns a registration error when lock acquisition fails.
    pub fn schedules(&self) -> DispatchTriggerResult<Vec<TriggerSchedule>> {
        let state = self.state.read().map_err(|err| registration_error(&err))?;
        Ok(state.schedules.clone())
    }
}

fn registration_error(err: &impl ToString) -> DispatchTriggerError {
    DispatchTriggerError::registration(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DispatchTrigger for RecordingDispatchTrigger {
    async fn register(&self, schedule: &TriggerSchedule) -> DispatchTriggerResult<()> {
        let mut state = self.state.write().map_err(|err| registration_error(&err))?;
        if let Some(message) = &state.failure {
            return Err(registration_error(message));
        }
        if state
            .schedules
            .iter()
            .any(|existing| existing.name() == schedule.name())
        {
            return Err(DispatchTriggerError::DuplicateSchedule(
                schedule.name().clone(),
            ));
        }
        state.schedules.push(schedule.clone());
        Ok(())
    }
}
