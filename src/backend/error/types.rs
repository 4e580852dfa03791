/**
 * Backend Error Types
 *
 * Every failure a request can end in, mapped onto the status code the
 * caller sees. Lower layers raise their own errors (`StoreError`,
 * `AccessError`, `SharedError`) and convert into `BackendError` with `?`.
 *
 * # Error Categories
 *
 * - `Unauthenticated` (401) - missing, invalid or expired bearer token
 * - `NotFound` (404) - the referenced board/list/card/user does not exist
 * - `Forbidden` (403) - it exists but the caller lacks the membership or role
 * - `Conflict` (409) - duplicate membership/assignment, removing the owner
 * - `SharedError` (422) - request validation failed
 * - `HandlerError` - any other explicit status chosen by a handler
 * - `Internal`, `Database`, `SerializationError` (500)
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::access::AccessError;
use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// ```rust
/// use kanban::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found("board");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// No usable credential was presented
    #[error("Unauthenticated: {message}")]
    Unauthenticated { message: String },

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Unexpected server-side failure (hashing, token issuance, task join)
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Validation errors from the shared wire types
    #[error(transparent)]
    SharedError(#[from] SharedError),

    #[error("Database error: {0}")]
    Database(StoreError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::HandlerError { status, .. } => *status,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                SharedError::SerializationError { .. } => StatusCode::BAD_REQUEST,
            },
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Server-side failures are not echoed.
    pub fn message(&self) -> String {
        match self {
            Self::Unauthenticated { message } => message.clone(),
            Self::NotFound { resource } => format!("{} not found", capitalize(resource)),
            Self::Forbidden { message } => message.clone(),
            Self::Conflict { message } => message.clone(),
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::Internal { .. } | Self::Database(_) | Self::SerializationError(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(resource) => Self::NotFound { resource },
            StoreError::Conflict(message) => Self::Conflict { message },
            StoreError::Invalid(err) => Self::SharedError(err),
            other => Self::Database(other),
        }
    }
}

impl From<AccessError> for BackendError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound(resource) => Self::NotFound { resource },
            AccessError::Forbidden(message) => Self::forbidden(message),
            AccessError::Conflict(message) => Self::conflict(message),
            AccessError::Invalid { field, message } => SharedError::validation(field, message).into(),
            AccessError::Store(err) => err.into(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
