/**
 * Register Handler
 *
 * POST /register
 *
 * # Registration Process
 *
 * 1. Validate username, email and password (`ValidJson`)
 * 2. Check that neither email nor username is taken
 * 3. Hash password using bcrypt
 * 4. Create user
 * 5. Return token and user info (201)
 */

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::auth::credentials::CredentialService;
use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::error::Result;
use crate::backend::validation::ValidJson;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid fields, "User already exists" or "Username already taken"
/// * `500 Internal Server Error` - hashing or store failure
///
/// # Example Request
///
/// ```http
/// POST /register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "securepassword123"
/// }
/// ```
pub async fn register(
    State(credentials): State<Arc<CredentialService>>,
    ValidJson(input): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    tracing::info!(username = %input.username, "Register request");
    let response = credentials.register(input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
