//! Common test utilities and helpers
//!
//! - A stub image generator
//! - A `TestServer` over the in-memory store
//! - Account helpers

#![allow(dead_code)]

pub mod auth_helpers;

pub use auth_helpers::*;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use dreamscape::backend::generation::{GenerationError, ImageGenerator};
use dreamscape::backend::routes::create_router;
use dreamscape::backend::server::{build_state, ServerConfig, Stores};

/// Secret used by every test server
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// What the stub generator answers
#[derive(Clone, Copy, Debug)]
pub enum StubGenerator {
    Url(&'static str),
    RateLimited,
    BadCredentials,
}

#[async_trait]
impl ImageGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        match self {
            Self::Url(url) => Ok(url.to_string()),
            Self::RateLimited => Err(GenerationError::RateLimited),
            Self::BadCredentials => Err(GenerationError::InvalidCredentials),
        }
    }
}

/// Configuration with the cheapest bcrypt cost
pub fn test_config() -> ServerConfig {
    let vars = HashMap::from([
        ("JWT_SECRET".to_string(), TEST_JWT_SECRET.to_string()),
        ("BCRYPT_COST".to_string(), "4".to_string()),
    ]);
    ServerConfig::from_vars(vars).expect("test configuration is valid")
}

/// Server over a fresh in-memory store
pub fn test_server(generator: StubGenerator) -> TestServer {
    let state = build_state(&test_config(), Stores::memory(), Arc::new(generator));
    TestServer::new(create_router(state)).expect("failed to start test server")
}

/// Server whose generator always returns `http://img/x.png`
pub fn default_server() -> TestServer {
    test_server(StubGenerator::Url("http://img/x.png"))
}
