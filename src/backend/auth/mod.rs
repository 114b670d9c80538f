//! Authentication Module
//!
//! User registration, login and session tokens.
//!
//! # Architecture
//!
//! - **`users`** - User data model and database operations
//! - **`sessions`** - JWT token generation and validation
//! - **`credentials`** - `CredentialService`: register, login, verify token
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and database operations
//! ├── sessions.rs     - JWT token management
//! ├── credentials.rs  - Credential service
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, email and password → user created → JWT returned
//! 2. **Login**: username (or email) and password → verified → JWT returned
//! 3. **Me**: JWT → verified by the auth layer → profile returned
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - JWT tokens are used for stateless authentication
//! - Tokens expire after 30 days by default
//! - Invalid credentials return 401 (no information leakage)

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// Registration, login and token verification
pub mod credentials;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use credentials::{AuthFailure, CredentialService};
pub use handlers::types::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
pub use handlers::{get_me, login, register};
