//! Webhook request derived from a task payload.

use super::ActionFailure;
use serde_json::{Map, Value};

/// Action tag handled by the built-in webhook handler.
pub const WEBHOOK_ACTION: &str = "webhook";

/// Outbound webhook call described by a task payload.
///
/// Payload shape: `{ "url": string, "data"?: any, "headers"?: object }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    url: String,
    body: Value,
    headers: Vec<(String, String)>,
}

impl WebhookRequest {
    /// Creates a request with an empty JSON object body and no headers.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: Value::Object(Map::new()),
            headers: Vec::new(),
        }
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Interprets a task payload as a webhook request.
    ///
    /// `data` defaults to `{}` when absent or null. Header values that are
    /// numbers or booleans are stringified.
    ///
    /// # Errors
    ///
    /// Returns an [`ActionFailure`] with `"Webhook URL missing in payload"`
    /// when `url` is absent, empty or not a string, or when a header value is
    /// not a scalar.
    pub fn from_payload(payload: &Value) -> Result<Self, ActionFailure> {
        let url = payload
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ActionFailure::new("Webhook URL missing in payload"))?;

        let body = match payload.get("data") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(data) => data.clone(),
        };

        let mut request = Self::new(url).with_body(body);
        if let Some(Value::Object(headers)) = payload.get("headers") {
            for (name, value) in headers {
                let rendered = match value {
                    Value::String(text) => text.clone(),
                    Value::Number(number) => number.to_string(),
                    Value::Bool(flag) => flag.to_string(),
                    _ => {
                        return Err(ActionFailure::new(format!(
                            "Webhook header {name} must be a scalar value"
                        )));
                    }
                };
                request = request.with_header(name.clone(), rendered);
            }
        }

        Ok(request)
    }

    /// Returns the target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the JSON body.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Returns the request headers in payload order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}
