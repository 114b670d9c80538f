/**
 * Account Routes
 *
 * # Routes
 *
 * - `POST /register` - User registration
 * - `POST /login` - User login
 * - `GET /me` - Current user info (requires authentication)
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::{get_me, login, register};
use crate::backend::middleware::require_auth;
use crate::backend::server::state::AppState;

/// Configure account routes
///
/// `/register` and `/login` are public; `/me` sits behind `require_auth`.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(get_me))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), require_auth));

    router
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}
