//! Port contracts for action execution.

pub mod handler;
pub mod transport;

pub use handler::ActionHandler;
pub use transport::{WebhookTransport, WebhookTransportError, WebhookTransportResult};
