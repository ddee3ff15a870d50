//! In-memory adapter implementations for testing.

mod transport;

pub use transport::RecordingWebhookTransport;
