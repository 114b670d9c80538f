/**
 * Login Handler
 *
 * POST /login
 *
 * Accepts a username or an email in the `username` field. Unknown users and
 * wrong passwords both answer 401 "Invalid credentials".
 */

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::backend::auth::credentials::CredentialService;
use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::error::Result;
use crate::backend::validation::ValidJson;

/// Login handler
///
/// # Example Response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "user": {
///     "id": "123e4567-e89b-12d3-a456-426614174000",
///     "username": "alice",
///     "email": "alice@example.com"
///   }
/// }
/// ```
pub async fn login(
    State(credentials): State<Arc<CredentialService>>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    tracing::info!(username = %input.username, "Login request");
    Ok(Json(credentials.login(input).await?))
}
