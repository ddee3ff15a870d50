//! Action registry and built-in action handlers.

mod registry;
mod webhook;

pub use registry::{ActionRegistry, ActionRegistryError};
pub use webhook::WebhookHandler;
