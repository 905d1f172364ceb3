//! Mapping of domain errors to HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clinica_core::CoreError;
use serde_json::json;

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    /// The request body could not be read as the expected payload.
    Payload(JsonRejection),
}

impl ApiError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        Self::Core(CoreError::not_found(entity, id))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(err) => match err {
                CoreError::Validation { .. } | CoreError::InvalidTimestamp(_) => {
                    StatusCode::BAD_REQUEST
                }
                CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                CoreError::Conflict { .. } => StatusCode::CONFLICT,
                CoreError::Store(_) | CoreError::Serialization(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            // Well-formed JSON of the wrong shape is a validation failure.
            Self::Payload(rejection) => match rejection.status() {
                StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
                other => other,
            },
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Payload(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Core(err) = &self {
            if err.is_server_error() {
                tracing::error!(error = %err, category = %err.category(), "request failed");
            } else if err.is_client_error() {
                tracing::debug!(error = %err, category = %err.category(), "request rejected");
            }
        }

        let body = match &self {
            Self::Core(err @ CoreError::Validation { field, .. }) => {
                json!({"error": err.to_string(), "field": field})
            }
            Self::Core(err) => json!({"error": err.to_string()}),
            Self::Payload(rejection) => json!({"error": rejection.body_text()}),
        };
        (status, Json(body)).into_response()
    }
}
