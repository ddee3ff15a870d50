//! Recording webhook transport for tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::action::{
    domain::WebhookRequest,
    ports::{WebhookTransport, WebhookTransportError, WebhookTransportResult},
};

/// Webhook transport that records requests and answers with a canned
/// response.
#[derive(Debug, Clone)]
pub struct RecordingWebhookTransport {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug)]
struct RecordingState {
    requests: Vec<WebhookRequest>,
    response: Result<u16, String>,
}

impl Default for RecordingWebhookTransport {
    fn default() -> Self {
        Self::responding_with(200)
    }
}

impl RecordingWebhookTransport {
    /// Creates a transport answering every request with `status`.
    #[must_use]
    pub fn responding_with(status: u16) -> Self {
        Self::with_response(Ok(status))
    }

    /// Creates a transport failing every request with a network error.
    #[must_use]
    pub fn failing_with(message: impl Into<String>) -> Self {
        Self::with_response(Err(message.into()))
    }

    fn with_response(response: Result<u16, String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(RecordingState {
                requests: Vec::new(),
                response,
            })),
        }
    }

    /// Returns the requests posted so far.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn requests(&self) -> WebhookTransportResult<Vec<WebhookRequest>> {
        let state = self.state.read().map_err(|err| transport_error(&err))?;
        Ok(state.requests.clone())
    }
}

fn transport_error(err: &impl ToString) -> WebhookTransportError {
    WebhookTransportError::new(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl WebhookTransport for RecordingWebhookTransport {
    async fn post(&self, request: &WebhookRequest) -> WebhookTransportResult<u16> {
        let mut state = self.state.write().map_err(|err| transport_error(&err))?;
        state.requests.push(request.clone());
        state.response.clone().map_err(|err| transport_error(&err))
    }
}
