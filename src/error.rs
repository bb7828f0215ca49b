//! Unified error handling for the API.
//!
//! Handlers return [`ApiResult`] and use `?`; every failure class maps to a
//! fixed status code and a JSON [`ErrorResponse`] body. Errors surface
//! directly to the caller, with no retry or recovery.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Unified error type for API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, or expired session token
    #[error("not authorized")]
    Unauthenticated,

    /// Authenticated but asking for another owner's records
    #[error("forbidden")]
    Forbidden,

    /// Path identifier is not a valid store identifier
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] mongodb::bson::oid::Error),

    /// The document store is unreachable or rejected the operation
    #[error("document store error: {0}")]
    Store(#[from] mongodb::error::Error),

    /// Anything else
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "not authorized".to_string(), None)
            }
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "forbidden".to_string(), None),
            ApiError::InvalidId(e) => {
                tracing::warn!("identifier rejected: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "invalid identifier".to_string(),
                    Some(e.to_string()),
                )
            }
            ApiError::Store(e) => {
                tracing::error!("document store error: {:?}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "document store unavailable".to_string(),
                    None,
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
