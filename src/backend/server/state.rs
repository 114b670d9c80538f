/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is built once in `init::build_state` from `ServerConfig` and
 * the chosen store. It holds the two services every handler talks to:
 * - `CredentialService` for register, login and token checks
 * - `DreamService` for everything under `/dreams`
 *
 * # State Extraction
 *
 * Handlers take `State<Arc<CredentialService>>` or `State<Arc<DreamService>>`
 * instead of the whole `AppState`.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::credentials::CredentialService;
use crate::backend::dreams::service::DreamService;

/// Shared services for all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Registration, login and bearer-token verification
    pub credentials: Arc<CredentialService>,

    /// Dream generation, sharing, reactions and search
    pub dreams: Arc<DreamService>,
}

impl FromRef<AppState> for Arc<CredentialService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.credentials.clone()
    }
}

impl FromRef<AppState> for Arc<DreamService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dreams.clone()
    }
}
