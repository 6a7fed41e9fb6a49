//! Mapping of failures onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::executor::ExecuteError;
use crate::store::StoreError;

/// Error returned by API handlers.
///
/// Rendered as `{"error": "<message>"}`. Access denials are reported as
/// 404 so that callers cannot probe for documents they may not see.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable caller identity on the request.
    #[error("User not authenticated")]
    Unauthenticated,

    /// The request itself is malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The JSON payload could not be read or decoded.
    #[error("{}", .0.body_text())]
    Payload(#[from] JsonRejection),

    /// Execution of a stored request failed.
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    /// The store rejected or failed an operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Payload(rejection) => rejection.status(),
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::Execute(ExecuteError::InvalidRequest(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Execute(ExecuteError::NotFound(_) | ExecuteError::AccessDenied)
            | Self::Store(StoreError::NotFound(_) | StoreError::AccessDenied) => {
                StatusCode::NOT_FOUND
            }
            Self::Execute(ExecuteError::ExecutionFailed { .. }) => StatusCode::BAD_GATEWAY,
            Self::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Execute(ExecuteError::Store(_)) | Self::Store(StoreError::Backend(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
