//! Action selection and payload values carried by a task.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Maximum length for an action tag, matching the `VARCHAR(100)` column.
const MAX_TAG_LENGTH: usize = 100;

/// Tag selecting the handler that executes a task (e.g. `webhook`).
///
/// Tags are trimmed but otherwise kept verbatim; lookups are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTag(String);

impl ActionTag {
    /// Creates a validated action tag.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyActionTag`] when the value is empty
    /// after trimming, or [`TaskDomainError::ActionTagTooLong`] when it
    /// exceeds 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();

        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyActionTag);
        }

        if normalized.chars().count() > MAX_TAG_LENGTH {
            return Err(TaskDomainError::ActionTagTooLong(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ActionTag {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque JSON object interpreted only by the selected action handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskPayload(Value);

impl TaskPayload {
    /// Wraps a JSON value as a task payload.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PayloadNotObject`] unless the value is a JSON
    /// object.
    pub fn new(value: Value) -> Result<Self, TaskDomainError> {
        if !value.is_object() {
            return Err(TaskDomainError::PayloadNotObject);
        }
        Ok(Self(value))
    }

    /// Returns the payload JSON.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}
