//! Authentication Handlers Module
//!
//! HTTP handlers for the account endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types, validation
//! ├── register.rs - User registration handler
//! ├── login.rs    - User authentication handler
//! └── me.rs       - Get current user handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /register - User registration
//! - **`login`** - POST /login - User authentication
//! - **`get_me`** - GET /me - Current user info (auth required)
//!
//! # Example
//!
//! ```rust,ignore
//! use dreamscape::backend::auth::handlers::{register, login, get_me};
//! use axum::{routing::post, routing::get, Router};
//!
//! let router = Router::new()
//!     .route("/register", post(register))
//!     .route("/login", post(login))
//!     .route("/me", get(get_me));
//! ```

/// Request and response types
pub mod types;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Get current user handler
pub mod me;

pub use types::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

pub use login::login;
pub use me::get_me;
pub use register::register;
