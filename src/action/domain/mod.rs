//! Domain model for action execution.

mod failure;
mod webhook;

pub use failure::ActionFailure;
pub use webhook::{WEBHOOK_ACTION, WebhookRequest};
