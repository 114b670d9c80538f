//! Backend Error Module
//!
//! Error types used by handlers, services and extractors, and their
//! conversion into HTTP responses.
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;

/// Result alias used across the backend
pub type Result<T> = std::result::Result<T, BackendError>;
