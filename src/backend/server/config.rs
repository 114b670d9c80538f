/**
 * Server Configuration
 *
 * This module handles loading of server configuration from environment
 * variables (after `.env` has been read) and the optional PostgreSQL
 * connection.
 *
 * # Variables
 *
 * | Variable | Default |
 * |---|---|
 * | `SERVER_PORT` | `3000` |
 * | `DATABASE_URL` | unset: in-memory store |
 * | `JWT_SECRET` | development secret, with a warning |
 * | `TOKEN_TTL_DAYS` | `30` |
 * | `BCRYPT_COST` | `10` |
 * | `GEMINI_API_KEY` | unset: generation answers 500 |
 * | `GEMINI_MODEL` | `gemini-2.5-flash` |
 * | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com` |
 * | `GENERATION_TIMEOUT_SECS` | `60` |
 *
 * # Error Handling
 *
 * A variable that is set but cannot be parsed is a `ConfigError`. A database
 * that cannot be reached is logged and the server falls back to the
 * in-memory store.
 */

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use sqlx::PgPool;
use thiserror::Error;

use crate::backend::auth::credentials::DEFAULT_PASSWORD_COST;
use crate::backend::generation::GeminiConfig;

/// Port used when `SERVER_PORT` is not set
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 30;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;

const DEVELOPMENT_JWT_SECRET: &str = "dreamscape-development-secret";

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Everything `main` needs to build the application
#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
    pub gemini: GeminiConfig,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_days", &self.token_ttl_days)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("gemini", &self.gemini)
            .finish()
    }
}

impl ServerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Read configuration from a variable map
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            vars.get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set. Using an insecure development secret.");
            DEVELOPMENT_JWT_SECRET.to_string()
        });

        let timeout_secs = parse(
            "GENERATION_TIMEOUT_SECS",
            get("GENERATION_TIMEOUT_SECS"),
            DEFAULT_GENERATION_TIMEOUT_SECS,
        )?;

        Ok(Self {
            port: parse("SERVER_PORT", get("SERVER_PORT"), DEFAULT_PORT)?,
            database_url: get("DATABASE_URL"),
            jwt_secret,
            token_ttl_days: parse("TOKEN_TTL_DAYS", get("TOKEN_TTL_DAYS"), DEFAULT_TOKEN_TTL_DAYS)?,
            bcrypt_cost: parse("BCRYPT_COST", get("BCRYPT_COST"), DEFAULT_PASSWORD_COST)?,
            gemini: GeminiConfig {
                api_key: get("GEMINI_API_KEY"),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: get("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

/// Connect to PostgreSQL and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if the connection fails (the caller falls back to memory)
pub async fn load_database(database_url: &str) -> Option<PgPool> {
    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            return None;
        }
    };

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(HashMap::new()).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database_url, None);
        assert_eq!(config.token_ttl_days, 30);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.gemini.api_key, None);
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_vars(vars(&[
            ("SERVER_PORT", "8080"),
            ("DATABASE_URL", "postgres://localhost/dreams"),
            ("JWT_SECRET", "s3cret"),
            ("BCRYPT_COST", "12"),
            ("GEMINI_API_KEY", "key"),
            ("GENERATION_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/dreams"));
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.gemini.api_key.as_deref(), Some("key"));
        assert_eq!(config.gemini.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_number() {
        let err = ServerConfig::from_vars(vars(&[("SERVER_PORT", "eighty")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "SERVER_PORT",
                ..
            }
        ));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = ServerConfig::from_vars(vars(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert!(!format!("{:?}", config).contains("s3cret"));
    }
}
