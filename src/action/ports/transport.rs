//! Outbound HTTP transport port used by the webhook handler.

use crate::action::domain::WebhookRequest;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for webhook transport operations.
pub type WebhookTransportResult<T> = Result<T, WebhookTransportError>;

/// Sends a single HTTP POST for a webhook request.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// Posts the request and returns the response status code.
    ///
    /// Non-2xx statuses are returned, not raised; only network-level failures
    /// are errors.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookTransportError`] when no response was received.
    async fn post(&self, request: &WebhookRequest) -> WebhookTransportResult<u16>;
}

/// Network-level failure raised by a webhook transport.
///
/// Displays as the underlying error's message.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct WebhookTransportError(Arc<dyn std::error::Error + Send + Sync>);

impl WebhookTransportError {
    /// Wraps a transport error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
