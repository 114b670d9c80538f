/**
 * Get Current User Handler
 *
 * GET /me, behind the auth layer. The user has already been resolved by
 * `require_auth`, so this only shapes the response.
 */

use axum::response::Json;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::middleware::auth::AuthUser;

/// Get current user handler
///
/// Returns the public profile of the caller, never the password hash.
pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse {
        id: user.id.to_string(),
        username: user.username,
        email: user.email,
    })
}
