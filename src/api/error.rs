//! API error type and its HTTP mapping.
//!
//! Every failure class gets a distinct status code; nothing is swallowed
//! or retried server-side. Bodies are `{"message": "..."}` like the rest
//! of the API's JSON.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::auth::AuthError;
use crate::core::{Denial, PipelineError};
use crate::store::StoreError;

/// An error ready to leave the API boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    /// Persistence failure; the caller may retry
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(%status, error = %self, "request failed");
        }
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PipelineError::InvalidStage(_) => ApiError::BadRequest(err.to_string()),
            PipelineError::Forbidden(Denial::Unauthenticated) => ApiError::Unauthorized,
            PipelineError::Forbidden(denial) => ApiError::Forbidden(denial.to_string()),
            PipelineError::Validation(msg) => ApiError::BadRequest(msg),
            PipelineError::Store(err) => ApiError::Unavailable(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { .. } => ApiError::BadRequest(err.to_string()),
            other => ApiError::Unavailable(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized,
            AuthError::Store(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::{Stage, TaskStage};

    #[test]
    fn test_pipeline_error_mapping() {
        let err: ApiError = PipelineError::NotFound { kind: "lead", id: 9 }.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = PipelineError::InvalidStage(TaskStage::parse("nope").unwrap_err()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = PipelineError::Forbidden(Denial::Unauthenticated).into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);

        let err: ApiError = PipelineError::Forbidden(Denial::AdminRequired).into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_duplicate_maps_to_bad_request() {
        let err: ApiError = StoreError::Duplicate {
            field: "slug",
            value: "x".to_string(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
