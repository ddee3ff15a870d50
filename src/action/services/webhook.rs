//! Built-in handler that posts the payload to a webhook URL.

use crate::action::{
    domain::{ActionFailure, WebhookRequest},
    ports::{ActionHandler, WebhookTransport},
};
use crate::task::domain::TaskPayload;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Action handler for the `webhook` tag.
///
/// Makes exactly one POST per execution. Any status outside `200..300` is a
/// failure, as is any network-level error.
#[derive(Debug)]
pub struct WebhookHandler<T>
where
    T: WebhookTransport,
{
    transport: Arc<T>,
}

impl<T> WebhookHandler<T>
where
    T: WebhookTransport,
{
    /// Creates a handler posting through `transport`.
    #[must_use]
    pub const fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl<T> ActionHandler for WebhookHandler<T>
where
    T: WebhookTransport,
{
    async fn execute(&self, payload: &TaskPayload) -> Result<(), ActionFailure> {
        let request = WebhookRequest::from_payload(payload.as_value())?;
        let status = self
            .transport
            .post(&request)
            .await
            .map_err(|err| ActionFailure::new(err.to_string()))?;

        debug!(url = request.url(), status, "webhook responded");
        if !(200..300).contains(&status) {
            return Err(ActionFailure::new(format!(
                "Webhook failed with status {status}"
            )));
        }
        Ok(())
    }
}
