//! API error type with IntoResponse
//!
//! Most failures are returned as plain text with a mapped status code.
//! A failed insert is the exception: it returns a JSON body whose
//! `details` field carries the normalized database error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::{describe_error, DbError};
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input (400)
    Validation(ValidationError),

    /// Empty result where one was required (404)
    NotFound { message: String },

    /// Pool could not hand out a connection (503)
    Unavailable { message: String },

    /// Statement deadline exceeded (504)
    Timeout { message: String },

    /// Statement failed; raw error text is returned (500)
    Query { message: String },

    /// Insert failed after reaching the database (500, JSON body)
    InsertFailed { details: String },
}

impl ApiError {
    /// Map a failed insert, keeping validation failures as 400s.
    pub fn insert_failed(err: DbError) -> Self {
        match err {
            DbError::Validation(e) => Self::Validation(e),
            other => {
                tracing::error!(error = %other, "insert failed");
                Self::InsertFailed {
                    details: describe_error(&other),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            Self::NotFound { message } => (StatusCode::NOT_FOUND, message).into_response(),
            Self::Unavailable { message } => {
                (StatusCode::SERVICE_UNAVAILABLE, message).into_response()
            }
            Self::Timeout { message } => (StatusCode::GATEWAY_TIMEOUT, message).into_response(),
            Self::Query { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            Self::InsertFailed { details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "failed to insert row",
                    "details": details
                })),
            )
                .into_response(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        let message = e.to_string();
        match e {
            DbError::Validation(v) => Self::Validation(v),
            DbError::NotFound { .. } => Self::NotFound { message },
            DbError::Connection(_) => {
                tracing::error!("Database unavailable: {}", message);
                Self::Unavailable { message }
            }
            DbError::Timeout { .. } => {
                tracing::warn!("{}", message);
                Self::Timeout { message }
            }
            DbError::Query { .. } => {
                tracing::error!("Database error: {}", message);
                Self::Query { message }
            }
        }
    }
}
