//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::types::ErrorResponse;
use crate::error::VanthuError;

/// Errors crossing the HTTP boundary.
#[derive(Debug)]
pub enum ApiError {
    /// The request itself is malformed (missing file, bad JSON, ...).
    Validation(String),
    /// The ingestion layer failed.
    Ingestion(VanthuError),
}

impl From<VanthuError> for ApiError {
    fn from(err: VanthuError) -> Self {
        Self::Ingestion(err)
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Ingestion(err) => match err {
                VanthuError::Storage { .. } => StatusCode::BAD_GATEWAY,
                VanthuError::Validation { .. } | VanthuError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Ingestion(err) => match err {
                VanthuError::Storage { .. } => "storage",
                VanthuError::Validation { .. } => "validation",
                VanthuError::UnsupportedFormat(_) => "unsupported_format",
                VanthuError::MissingDependency(_) => "missing_dependency",
                _ => "internal",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Validation(message) => message.clone(),
            Self::Ingestion(err) => err.to_string(),
        };

        tracing::debug!(status = %status, %message, "request failed");

        let body = ErrorResponse {
            error_type: self.error_type().to_string(),
            message,
            status_code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::Validation("no file uploaded".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_type(), "validation");
    }

    #[test]
    fn test_storage_maps_to_bad_gateway() {
        let err = ApiError::Ingestion(VanthuError::storage("drive quota"));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_type(), "storage");
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err = ApiError::Ingestion(VanthuError::parsing("bad bytes"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_type(), "internal");
    }
}
