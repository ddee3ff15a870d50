//! `reqwest`-backed webhook transport.

use crate::action::{
    domain::WebhookRequest,
    ports::{WebhookTransport, WebhookTransportError, WebhookTransportResult},
};
use async_trait::async_trait;

/// Webhook transport over a shared [`reqwest::Client`].
///
/// The client is built once at start-up and cloned cheaply; requests use the
/// client's default timeout and are never retried.
#[derive(Debug, Clone)]
pub struct ReqwestWebhookTransport {
    client: reqwest::Client,
}

impl ReqwestWebhookTransport {
    /// Creates a transport around an existing client.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookTransport for ReqwestWebhookTransport {
    async fn post(&self, request: &WebhookRequest) -> WebhookTransportResult<u16> {
        let mut builder = self.client.post(request.url());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        // Caller-supplied Content-Type wins; `json` only fills it in when absent.
        let response = builder
            .json(request.body())
            .send()
            .await
            .map_err(WebhookTransportError::new)?;
        Ok(response.status().as_u16())
    }
}
