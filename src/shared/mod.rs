//! Shared Module
//!
//! Wire types and errors used by the HTTP API. These types carry no
//! server-side dependencies and can be reused by API clients.

/// Shared error types
pub mod error;

/// Dream request/response bodies
pub mod dream;

pub use dream::{DreamPage, DreamView, OwnerView, SortBy};
pub use error::{FieldError, SharedError};
