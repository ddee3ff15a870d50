//! Registry mapping action tags to handlers.

use crate::action::ports::ActionHandler;
use crate::task::domain::ActionTag;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors returned while populating an [`ActionRegistry`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionRegistryError {
    /// A handler is already registered for the tag.
    #[error("handler for action '{0}' is already registered")]
    AlreadyRegistered(ActionTag),
}

/// Maps action tags to handlers.
///
/// The registry is populated at start-up and then shared read-only with the
/// execution service. New action types are added by registering another
/// handler; the execution service never changes.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    handlers: HashMap<ActionTag, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`ActionRegistryError::AlreadyRegistered`] when `tag` already
    /// has a handler; the existing handler is kept.
    pub fn register(
        &mut self,
        tag: ActionTag,
        handler: Arc<dyn ActionHandler>,
    ) -> Result<(), ActionRegistryError> {
        if self.handlers.contains_key(&tag) {
            return Err(ActionRegistryError::AlreadyRegistered(tag));
        }
        self.handlers.insert(tag, handler);
        Ok(())
    }

    /// Returns the handler registered for `tag`, if any.
    #[must_use]
    pub fn resolve(&self, tag: &ActionTag) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(tag).cloned()
    }

    /// Returns the registered tags in lexical order.
    #[must_use]
    pub fn registered_tags(&self) -> Vec<ActionTag> {
        let mut tags: Vec<ActionTag> = self.handlers.keys().cloned().collect();
        tags.sort_by(|left, right| left.as_str().cmp(right.as_str()));
        tags
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("tags", &self.registered_tags())
            .finish()
    }
}
