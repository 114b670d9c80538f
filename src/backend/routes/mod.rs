//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation and layers
//! ├── api_routes.rs   - Account endpoints
//! └── dream_routes.rs - Dream endpoints
//! ```
//!
//! # Route Organization
//!
//! Each `configure_*` function adds its public routes directly and its
//! protected routes through a sub-router carrying the `require_auth` route
//! layer, then merges the two.

pub mod api_routes;
pub mod dream_routes;
pub mod router;

pub use router::create_router;
