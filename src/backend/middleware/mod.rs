//! Middleware Module
//!
//! HTTP middleware applied to routes before they reach handlers.
//!
//! - **`auth`** - bearer-token authentication for protected routes
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware;
//! use dreamscape::backend::middleware::require_auth;
//!
//! let protected = protected.route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

pub mod auth;

pub use auth::{bearer_token, require_auth, AuthUser, AuthenticatedUser};
