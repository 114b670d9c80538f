/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Layers
 *
 * - `TraceLayer` logs every request and response
 * - `CorsLayer::permissive` lets the browser client call the API
 * - unknown paths answer a JSON 404
 */

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::dream_routes::configure_dream_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// 1. **Health**: `GET /health`
/// 2. **Account Routes**: register, login, me
/// 3. **Dream Routes**: generation, feed, sharing, reactions, search
/// 4. **Fallback**: JSON 404
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));

    let router = configure_api_routes(router, &app_state);
    let router = configure_dream_routes(router, &app_state);

    router
        .fallback(|| async { BackendError::not_found("Route not found") })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}

/// Liveness probe
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
