//! Backend Module
//!
//! All server-side code for Dreamscape: an Axum HTTP API where users
//! register, generate images from text prompts and share, like and search
//! them.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, app creation
//! - **`routes`** - Route configuration and router assembly
//! - **`auth`** - Users, JWT sessions, credential service, account handlers
//! - **`middleware`** - Bearer-token authentication layer
//! - **`validation`** - Validating JSON and query extractors
//! - **`dreams`** - Dream model, service and handlers
//! - **`generation`** - Image generation client
//! - **`store`** - PostgreSQL and in-memory persistence
//! - **`error`** - Backend error type and its HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── validation.rs   - Request validation
//! ├── dreams/         - Dream operations
//! ├── generation/     - Image generation
//! ├── store/          - Persistence
//! └── error/          - Error types
//! ```
//!
//! # Request Pipeline
//!
//! 1. `TraceLayer` and CORS
//! 2. `require_auth` route layer on protected routes
//! 3. `ValidJson` / `ValidQuery` extractors
//! 4. Handler, then `CredentialService` or `DreamService`
//! 5. `BackendError` rendered as `{"error", "status", "errors"?}`

/// Authentication and user management
pub mod auth;

/// Dream operations
pub mod dreams;

/// Backend error types
pub mod error;

/// Image generation client
pub mod generation;

/// Request middleware
pub mod middleware;

/// HTTP route configuration
pub mod routes;

/// Server initialization, configuration and state
pub mod server;

/// User and dream persistence
pub mod store;

/// Request validation extractors
pub mod validation;

pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
