//! Dreams Module
//!
//! Generated images, their visibility and reactions, and the searches over
//! them.
//!
//! # Module Structure
//!
//! ```text
//! dreams/
//! ├── mod.rs       - Module exports and documentation
//! ├── models.rs    - Dream record, commands and queries
//! ├── db.rs        - PostgreSQL queries
//! ├── requests.rs  - Request validation
//! ├── service.rs   - DreamService operations
//! └── handlers.rs  - HTTP handlers
//! ```

pub mod db;
pub mod handlers;
pub mod models;
pub mod requests;
pub mod service;

pub use models::{Dream, Pagination, Reaction};
pub use service::DreamService;
