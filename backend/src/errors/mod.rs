//! Global application error types and handlers.
//!
//! This module defines the error taxonomy shared by every handler and the
//! mapping from each kind to an HTTP status and a JSON body of the form
//! `{"error": <code>, "message": <text>}`.
//!
//! Only writes surface `StoreUnavailable`; read paths degrade to neutral
//! defaults inside the services and never construct it.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use storage::StoreError;
use thiserror::Error;

use crate::auth::AuthError;
use crate::services::classification::FilterError;

/// Malformed input, rejected before any store access.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("placeId must not be empty")]
    EmptyPlaceId,

    #[error("placeId must be at most {max} bytes")]
    PlaceIdTooLong { max: usize },

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    #[error("comment must be between 1 and {max} characters")]
    CommentLength { max: usize },

    #[error("invalid filter: {0}")]
    Filter(#[from] FilterError),

    #[error("malformed request body: {0}")]
    Body(String),

    #[error("malformed path: {0}")]
    Path(String),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationError::Body(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(ValidationError::Path(rejection.body_text()))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_maps_to_its_status() {
        assert_eq!(
            ApiError::from(AuthError::MissingToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(ValidationError::EmptyPlaceId).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::NotConfigured).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::NotFound("review 7".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn codes_are_stable_identifiers() {
        let err = ApiError::from(ValidationError::RatingOutOfRange(9));
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.to_string(), "rating must be between 1 and 5, got 9");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
