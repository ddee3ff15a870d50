//! Action handler port.

use crate::action::domain::ActionFailure;
use crate::task::domain::TaskPayload;
use async_trait::async_trait;

/// Executor for one action tag.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Runs the action once for the given payload.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionFailure`] describing why the action did not
    /// succeed.
    async fn execute(&self, payload: &TaskPayload) -> Result<(), ActionFailure>;
}
