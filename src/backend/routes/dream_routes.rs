/**
 * Dream Routes
 *
 * # Public
 * - `GET /dreams/public`
 * - `GET /dreams/public/search`
 *
 * # Authenticated
 * - `POST /dreams/generate`
 * - `GET /dreams`
 * - `POST /dreams/share`
 * - `POST /dreams/like`
 * - `POST /dreams/dislike`
 * - `GET /dreams/search`
 * - `GET /dreams/filter/search`
 * - `GET /dreams/sharedtome`
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::dreams::handlers::{
    dislike_dream, generate_dream, like_dream, list_own_dreams, list_public_dreams,
    list_shared_dreams, search_dreams, search_own_dreams, search_public_dreams, share_dream,
};
use crate::backend::middleware::require_auth;
use crate::backend::server::state::AppState;

/// Configure dream routes
///
/// The auth layer runs before any extractor, so a protected route without a
/// token answers 401 even when its body is invalid.
pub fn configure_dream_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/dreams", get(list_own_dreams))
        .route("/dreams/generate", post(generate_dream))
        .route("/dreams/share", post(share_dream))
        .route("/dreams/like", post(like_dream))
        .route("/dreams/dislike", post(dislike_dream))
        .route("/dreams/search", get(search_own_dreams))
        .route("/dreams/filter/search", get(search_dreams))
        .route("/dreams/sharedtome", get(list_shared_dreams))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), require_auth));

    router
        .route("/dreams/public", get(list_public_dreams))
        .route("/dreams/public/search", get(search_public_dreams))
        .merge(protected)
}
