//! Failure reported by an action handler.

use thiserror::Error;

/// Human-readable reason an action did not succeed.
///
/// The message is recorded verbatim as the task's `errorMessage`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ActionFailure(String);

impl ActionFailure {
    /// Creates a failure with the given reason.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Consumes the failure and returns the reason.
    #[must_use]
    pub fn into_message(self) -> String {
        self.0
    }
}
