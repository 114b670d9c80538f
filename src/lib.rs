//! Dreamscape - Main Library
//!
//! Backend for a text-to-image sharing app. Users register and log in,
//! generate images ("dreams") from prompts, share them privately or publish
//! them, react with likes and dislikes, and search the feed.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types used by the HTTP API
//!   - Dream views, request bodies, search pages
//!   - Field-level error types
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server, routes and middleware
//!   - Authentication with bcrypt and JWT
//!   - PostgreSQL (sqlx) and in-memory stores
//!   - Gemini image generation client
//!
//! # Usage
//!
//! ```rust,no_run
//! use dreamscape::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `backend::error::BackendError` for every handler and service
//! - `shared::error` for wire-level validation errors

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
