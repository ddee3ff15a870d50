//! Mapping of service errors onto HTTP responses.

use crate::task::{domain::TaskId, services::SubmissionError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// No task exists for the identifier.
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// A backing service failed.
    #[error("{context}: {source}")]
    Internal {
        /// Client-facing summary.
        context: &'static str,
        /// Underlying failure.
        #[source]
        source: SubmissionError,
    },
}

impl ApiError {
    /// Classifies a submission error: validation failures become
    /// `400 Bad Request`, everything else `500` with `context`.
    #[must_use]
    pub fn from_submission(context: &'static str, err: SubmissionError) -> Self {
        if err.is_validation() {
            Self::BadRequest(err.to_string())
        } else {
            Self::Internal {
                context,
                source: err,
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Self::NotFound(task_id) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("Task not found: {task_id}") })),
            )
                .into_response(),
            Self::Internal { context, source } => {
                error!(error = %source, "{context}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": context, "error": source.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
