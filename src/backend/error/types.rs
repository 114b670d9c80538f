/**
 * Backend Error Types
 *
 * This module defines the single error type returned by handlers, services
 * and extractors. Every variant maps to exactly one HTTP status.
 *
 * # Error Categories
 *
 * - `Validation` - missing or malformed input (400, with field details)
 * - `BadRequest` - well-formed input the operation refuses (400)
 * - `Unauthorized` - token or credential failures (401)
 * - `NotFound` - dream/user absent, not owned, or not public (404)
 * - `Generation` - image generation upstream failures (429 / 401 / 500)
 * - `Store` / `Internal` - anything unexpected (500, generic message)
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::credentials::AuthFailure;
use crate::backend::generation::GenerationError;
use crate::backend::store::StoreError;
use crate::shared::{FieldError, SharedError};

/// Message returned for every 500 that is not a generation failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use dreamscape::backend::error::BackendError;
///
/// let err = BackendError::not_found("Dream not found");
/// assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// One or more request fields failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Request was understood but cannot be honoured
    #[error("{0}")]
    BadRequest(String),

    /// Authentication failure
    #[error(transparent)]
    Unauthorized(#[from] AuthFailure),

    /// Resource does not exist or is not visible to the caller
    #[error("{0}")]
    NotFound(String),

    /// External image generator failed
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Anything else (hashing, token signing, join errors)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BackendError {
    /// Create a validation error for a single field
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Create a new bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Generation(err) => match err {
                GenerationError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                GenerationError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message shown to the client.
    ///
    /// Store and internal failures never expose their cause.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(_) => "Validation failed".to_string(),
            Self::BadRequest(message) | Self::NotFound(message) => message.clone(),
            Self::Unauthorized(failure) => failure.to_string(),
            Self::Generation(err) => match err {
                GenerationError::RateLimited => {
                    "API rate limit exceeded. Try again later.".to_string()
                }
                GenerationError::InvalidCredentials => {
                    "Invalid image generation API key. Check your credentials.".to_string()
                }
                GenerationError::NotConfigured => {
                    "Image generation API key not configured".to_string()
                }
                _ => "Error generating dream image".to_string(),
            },
            Self::Store(_) | Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    /// Field details, present only for validation failures
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<SharedError> for BackendError {
    fn from(err: SharedError) -> Self {
        Self::Validation(vec![err.into()])
    }
}

impl From<bcrypt::BcryptError> for BackendError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Internal(format!("password hashing failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for BackendError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(format!("token signing failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for BackendError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("blocking task failed: {}", err))
    }
}
