//! API error handling
//!
//! Maps application errors onto HTTP statuses and a uniform
//! `{ "error": ... }` body.

use application::ApplicationError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or failed validation
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A referenced resource (e.g. an address) could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// An upstream provider is unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Uniform error body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::BadRequest(e.to_string()),
            ApplicationError::NotFound(resource) => Self::NotFound(resource),
            ApplicationError::ExternalService(e) => Self::ServiceUnavailable(e),
            ApplicationError::Configuration(e) | ApplicationError::Internal(e) => {
                Self::Internal(e)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use domain::DomainError;

    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::ServiceUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn from_application_error() {
        let err: ApiError = ApplicationError::NotFound("rue imaginaire".into()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = ApplicationError::ExternalService("HTTP 502".into()).into();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));

        let err: ApiError = ApplicationError::Domain(DomainError::InvalidCoordinates).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn error_body_shape() {
        let err = ApiError::BadRequest("missing field".into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
