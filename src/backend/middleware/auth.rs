/**
 * Authentication Middleware
 *
 * Route layer for endpoints that require a signed-in user. It reads the
 * bearer token from the `Authorization` header, resolves it through the
 * `CredentialService` and stores the user in the request extensions, where
 * handlers pick it up with the `AuthUser` extractor.
 */

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::credentials::{AuthFailure, CredentialService};
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;

/// Authenticated user data resolved from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware
///
/// 1. Extracts the JWT from the Authorization header
/// 2. Verifies it and loads the user
/// 3. Attaches `AuthenticatedUser` to the request extensions
///
/// Returns 401 with "Not authorized, no token", "Not authorized, token
/// invalid" or "Not authorized, user not found" otherwise.
pub async fn require_auth(
    State(credentials): State<Arc<CredentialService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = bearer_token(request.headers());
    if token.is_none() {
        tracing::warn!(path = %request.uri().path(), "Missing bearer token");
    }

    let user = credentials.verify_token(token).await?;
    request
        .extensions_mut()
        .insert(AuthenticatedUser::from(user));

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind [`require_auth`].
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::from(AuthFailure::NoToken)
            })?;

        Ok(AuthUser(user))
    }
}
