//! Server Module
//!
//! Configuration, application state and app construction.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Environment configuration and database loading
//! └── init.rs         - Store selection, state wiring, app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env` in `main`
//! 2. **Store Selection**: PostgreSQL if configured and reachable, else memory
//! 3. **State Creation**: services wired into `AppState`
//! 4. **Router Creation**: routes, auth layer, tracing and CORS
//!
//! # Example
//!
//! ```rust,no_run
//! use dreamscape::backend::server::{config::ServerConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod init;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use init::{build_state, create_app, Stores};
pub use state::AppState;
