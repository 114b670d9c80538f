/**
 * Server Initialization
 *
 * This module turns a `ServerConfig` into a ready-to-serve router.
 *
 * # Initialization Process
 *
 * 1. Pick the store: PostgreSQL when `DATABASE_URL` is set and reachable,
 *    otherwise the in-memory store
 * 2. Build the Gemini image generator
 * 3. Wire the credential and dream services into `AppState`
 * 4. Create the router
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::auth::credentials::CredentialService;
use crate::backend::auth::sessions::SessionKeys;
use crate::backend::dreams::service::DreamService;
use crate::backend::generation::{GeminiImageGenerator, GenerationError, ImageGenerator};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::{DreamStore, MemoryStore, PgStore, UserStore};

/// User and dream persistence behind their traits
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub dreams: Arc<dyn DreamStore>,
}

impl Stores {
    /// Both traits served by one in-memory store
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            dreams: store,
        }
    }

    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            dreams: store,
        }
    }
}

/// Wire services into the application state
pub fn build_state(
    config: &ServerConfig,
    stores: Stores,
    generator: Arc<dyn ImageGenerator>,
) -> AppState {
    let keys = SessionKeys::new(
        &config.jwt_secret,
        chrono::Duration::days(config.token_ttl_days),
    );

    AppState {
        credentials: Arc::new(CredentialService::new(
            stores.users.clone(),
            keys,
            config.bcrypt_cost,
        )),
        dreams: Arc::new(DreamService::new(stores.dreams, stores.users, generator)),
    }
}

/// Select the store for this configuration
///
/// A missing or unreachable database falls back to memory, so the server
/// still starts.
pub async fn load_stores(config: &ServerConfig) -> Stores {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Using the in-memory store; data is lost on restart.");
        return Stores::memory();
    };

    match load_database(database_url).await {
        Some(pool) => Stores::postgres(PgStore::new(pool)),
        None => {
            tracing::warn!("Database unavailable. Using the in-memory store.");
            Stores::memory()
        }
    }
}

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails only if the HTTP client for image generation cannot be built.
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, GenerationError> {
    tracing::info!("Initializing Dreamscape backend server");

    let stores = load_stores(config).await;

    if config.gemini.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set. Dream generation will fail until it is configured.");
    }
    let generator = Arc::new(GeminiImageGenerator::new(config.gemini.clone())?);

    let app_state = build_state(config, stores, generator);
    tracing::info!("Router configured");

    Ok(create_router(app_state))
}
