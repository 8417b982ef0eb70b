//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from docack-core, provider errors from
//! docack-providers, and SQLx errors to HTTP status codes. Returns JSON
//! error response bodies with error code and message. Never exposes
//! internal or upstream error details in responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
///
/// Maps domain errors to appropriate HTTP status codes and structured
/// JSON error bodies. Internal and upstream error details are never
/// exposed to clients.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failure (401). The gate redirects unauthenticated
    /// page traffic; this surfaces only on direct API misuse.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A managed provider call failed (502). Message is logged but not
    /// returned to the client.
    #[error("upstream provider failure: {0}")]
    Upstream(String),

    /// Internal server error (500). Message is logged but not returned
    /// to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal or upstream error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Upstream(_) => "An upstream service failed".to_string(),
            other => other.to_string(),
        };

        // Log suppressed errors for operator visibility.
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Upstream(_) => tracing::error!(error = %self, "upstream provider failure"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert docack-core validation errors to API errors.
impl From<docack_core::ValidationError> for AppError {
    fn from(err: docack_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Convert provider errors to API errors. Every provider failure is an
/// upstream failure from the client's perspective.
impl From<docack_providers::ProviderError> for AppError {
    fn from(err: docack_providers::ProviderError) -> Self {
        Self::Upstream(err.to_string())
    }
}

/// Convert SQLx errors to API errors.
///
/// The only non-PK unique constraint in the schema is
/// `acknowledgments(document_id, user_id)`, so a 23505 unique violation
/// always means a duplicate acknowledgment and maps to Conflict. Both
/// foreign keys reference `documents(id)`, so a 23503 violation means
/// the document was deleted between lookup and write and maps to
/// NotFound.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some("23505") => {
                    return Self::Conflict("document already acknowledged".to_string())
                }
                Some("23503") => return Self::NotFound("document no longer exists".to_string()),
                _ => {}
            }
        }
        Self::Internal(err.to_string())
    }
}
