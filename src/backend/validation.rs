//! Request Validation
//!
//! The validation stage of the request pipeline. Request bodies and query
//! strings are deserialized into loose wire types, then converted into the
//! typed input of each operation by [`Validate`]. Failures become a 400 with
//! one entry per offending field.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::backend::error::BackendError;
use crate::shared::FieldError;

/// Convert a wire type into validated operation input
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, Vec<FieldError>>;
}

/// JSON body extractor that runs [`Validate`]
pub struct ValidJson<T: Validate>(pub T::Output);

/// Query string extractor that runs [`Validate`]
pub struct ValidQuery<T: Validate>(pub T::Output);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::warn!(reason = %rejection.body_text(), "Rejected request body");
            BackendError::invalid("body", rejection.body_text())
        })?;

        payload.validate().map(ValidJson).map_err(|errors| {
            tracing::warn!(fields = errors.len(), "Request validation failed");
            BackendError::Validation(errors)
        })
    }
}

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| BackendError::invalid("query", rejection.body_text()))?;

        params
            .validate()
            .map(ValidQuery)
            .map_err(BackendError::Validation)
    }
}

/// Collects field errors while validating a request
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    /// Record the error of a failed conversion and return `None`
    pub fn check<T, E: Into<FieldError>>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.0.push(err.into());
                None
            }
        }
    }

    /// A required, non-blank string field
    pub fn required(&mut self, field: &str, value: Option<String>, message: &str) -> Option<String> {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.push(field, message);
                None
            }
        }
    }

    /// An optional positive integer sent as a string
    pub fn positive(&mut self, field: &str, value: Option<&str>, default: u32) -> u32 {
        match value.map(str::trim) {
            None | Some("") => default,
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    self.push(field, format!("{} must be a positive integer", field));
                    default
                }
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` when no errors were recorded and every field was present
    pub fn into_result<T>(mut self, value: Option<T>) -> Result<T, Vec<FieldError>> {
        match value {
            Some(value) if self.0.is_empty() => Ok(value),
            _ => {
                if self.0.is_empty() {
                    self.push("body", "Invalid request");
                }
                Err(self.0)
            }
        }
    }
}
