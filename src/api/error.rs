//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use habesha_core::chat::CHAT_SERVICE_ERROR;
use habesha_core::FormErrors;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::ChatError;
use crate::sessions::SessionError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("{0}")]
    Validation(String),

    /// A submitted form has per-field errors
    #[error("Please correct the highlighted fields.")]
    InvalidForm(FormErrors),

    /// Contextual session token missing, unknown or expired
    #[error("{0}")]
    InvalidSession(String),

    /// Login rejected
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(crate::storage::StorageError),

    /// Chat backend failed; the cause is only logged
    #[error("Error communicating with the chatbot service.")]
    Chat(ChatError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::storage::StorageError> for ApiError {
    fn from(err: crate::storage::StorageError) -> Self {
        match err {
            crate::storage::StorageError::Conflict(what) => ApiError::Conflict(what),
            other => ApiError::Storage(other),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::EmptyMessage => ApiError::Validation(err.to_string()),
            other => ApiError::Chat(other),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidTtl { .. } => ApiError::Validation(err.to_string()),
            SessionError::Storage(e) => e.into(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Per-field messages for form errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FormErrors>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::InvalidForm(_) => (StatusCode::BAD_REQUEST, "INVALID_FORM"),
            ApiError::InvalidSession(_) => (StatusCode::FORBIDDEN, "INVALID_SESSION"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ApiError::Chat(_) => (StatusCode::SERVICE_UNAVAILABLE, "CHAT_UNAVAILABLE"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            let cause = match &self {
                ApiError::Chat(e) => e.to_string(),
                other => other.to_string(),
            };
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %cause,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let message = match &self {
            ApiError::Chat(_) => CHAT_SERVICE_ERROR.to_string(),
            other => other.to_string(),
        };
        let fields = match self {
            ApiError::InvalidForm(fields) => Some(fields),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                fields,
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
