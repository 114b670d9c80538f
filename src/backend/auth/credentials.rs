/**
 * Credential Service
 *
 * Registration, login and token verification. Holds the user store, the
 * session keys and the bcrypt cost; built once at startup and shared through
 * `AppState`.
 *
 * # Security
 *
 * - Passwords are hashed with bcrypt on the blocking thread pool
 * - Login failures use one message whether or not the user exists
 * - Passwords, hashes and tokens are never logged
 */

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::handlers::types::{
    AuthResponse, LoginInput, RegisterInput, UserResponse,
};
use crate::backend::auth::sessions::SessionKeys;
use crate::backend::auth::users::{normalize_email, NewUser, User};
use crate::backend::error::{BackendError, Result};
use crate::backend::store::{StoreError, UserStore};

/// bcrypt cost factor used for new password hashes
pub const DEFAULT_PASSWORD_COST: u32 = 10;

/// Why a request was not authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("Not authorized, no token")]
    NoToken,
    #[error("Not authorized, token invalid")]
    InvalidToken,
    #[error("Not authorized, user not found")]
    UserNotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
}

pub struct CredentialService {
    users: Arc<dyn UserStore>,
    keys: SessionKeys,
    password_cost: u32,
    /// Verified against on unknown-user logins so both failures cost one bcrypt check
    dummy_hash: Option<String>,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>, keys: SessionKeys, password_cost: u32) -> Self {
        let dummy_hash = bcrypt::hash("dreamscape-unknown-user", password_cost).ok();
        Self {
            users,
            keys,
            password_cost,
            dummy_hash,
        }
    }

    /// Create an account and sign the user in
    ///
    /// # Errors
    ///
    /// * `BadRequest("User already exists")` - email taken
    /// * `BadRequest("Username already taken")` - username taken
    pub async fn register(&self, input: RegisterInput) -> Result<AuthResponse> {
        if self.users.find_user_by_email(&input.email).await?.is_some() {
            tracing::warn!(email = %input.email, "Registration for existing email");
            return Err(BackendError::bad_request("User already exists"));
        }
        if self
            .users
            .find_user_by_username(&input.username)
            .await?
            .is_some()
        {
            tracing::warn!(username = %input.username, "Registration for taken username");
            return Err(BackendError::bad_request("Username already taken"));
        }

        let cost = self.password_cost;
        let password = input.password;
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

        let user = self
            .users
            .create_user(NewUser {
                username: input.username,
                email: input.email,
                password_hash,
            })
            .await
            .map_err(|err| match err {
                StoreError::Conflict { field } if field == "username" => {
                    BackendError::bad_request("Username already taken")
                }
                StoreError::Conflict { .. } => BackendError::bad_request("User already exists"),
                other => other.into(),
            })?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        self.issue(&user)
    }

    /// Check a username (or email) and password pair
    pub async fn login(&self, input: LoginInput) -> Result<AuthResponse> {
        let user = if input.username.contains('@') {
            self.users
                .find_user_by_email(&normalize_email(&input.username))
                .await?
        } else {
            self.users.find_user_by_username(&input.username).await?
        };

        let Some(user) = user else {
            if let Some(hash) = self.dummy_hash.clone() {
                let password = input.password;
                tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
            }
            tracing::warn!(username = %input.username, "Login for unknown user");
            return Err(AuthFailure::InvalidCredentials.into());
        };

        let hash = user.password_hash.clone();
        let password = input.password;
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        if !valid {
            tracing::warn!(username = %user.username, "Login with wrong password");
            return Err(AuthFailure::InvalidCredentials.into());
        }

        tracing::info!(user_id = %user.id, "User logged in");
        self.issue(&user)
    }

    /// Resolve a bearer token to its user
    ///
    /// # Errors
    ///
    /// `Unauthorized` with `NoToken`, `InvalidToken` (bad signature, expired,
    /// malformed subject) or `UserNotFound`.
    pub async fn verify_token(&self, token: Option<&str>) -> Result<User> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthFailure::NoToken)?;

        let claims = self.keys.verify_token(token).map_err(|e| {
            tracing::warn!(error = %e, "Rejected token");
            AuthFailure::InvalidToken
        })?;
        let user_id: Uuid = claims.user_id().map_err(|_| AuthFailure::InvalidToken)?;

        self.users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(%user_id, "Token for unknown user");
                AuthFailure::UserNotFound.into()
            })
    }

    fn issue(&self, user: &User) -> Result<AuthResponse> {
        let token = self.keys.create_token(user.id, &user.username)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::MemoryStore;
    use chrono::Duration;

    const TEST_COST: u32 = 4;

    fn service() -> CredentialService {
        CredentialService::new(
            Arc::new(MemoryStore::new()),
            SessionKeys::new("test-secret", Duration::days(30)),
            TEST_COST,
        )
    }

    fn alice() -> RegisterInput {
        RegisterInput {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        }
    }

    fn login(username: &str, password: &str) -> LoginInput {
        LoginInput {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_verify() {
        let service = service();
        let response = service.register(alice()).await.unwrap();
        let user = service.verify_token(Some(&response.token)).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "password123");
    }

    #[tokio::test]
    async fn test_register_same_email_twice() {
        let service = service();
        service.register(alice()).await.unwrap();
        let err = service
            .register(RegisterInput {
                username: "alice2".to_string(),
                ..alice()
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), "User already exists");
    }

    #[tokio::test]
    async fn test_register_same_username_twice() {
        let service = service();
        service.register(alice()).await.unwrap();
        let err = service
            .register(RegisterInput {
                email: "other@example.com".to_string(),
                ..alice()
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Username already taken");
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let service = service();
        service.register(alice()).await.unwrap();

        let wrong_password = service.login(login("alice", "wrong-password")).await.unwrap_err();
        let unknown_user = service.login(login("bob", "wrong-password")).await.unwrap_err();

        assert_eq!(wrong_password.status_code(), unknown_user.status_code());
        assert_eq!(wrong_password.message(), unknown_user.message());
        assert_eq!(wrong_password.message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_unknown_user_login_pays_for_a_hash_check() {
        let service = service();
        let dummy = service.dummy_hash.clone().unwrap();
        assert_eq!(dummy.split('$').nth(2), Some("04"));

        let err = service.login(login("nobody", "password123")).await.unwrap_err();
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_login_by_email() {
        let service = service();
        service.register(alice()).await.unwrap();
        let response = service
            .login(login("ALICE@example.com", "password123"))
            .await
            .unwrap();
        assert_eq!(response.user.username, "alice");
    }

    #[tokio::test]
    async fn test_verify_token_failures() {
        let service = service();

        let missing = service.verify_token(None).await.unwrap_err();
        assert_eq!(missing.message(), "Not authorized, no token");

        let garbage = service.verify_token(Some("not-a-jwt")).await.unwrap_err();
        assert_eq!(garbage.message(), "Not authorized, token invalid");

        let orphan = SessionKeys::new("test-secret", Duration::days(30))
            .create_token(Uuid::new_v4(), "ghost")
            .unwrap();
        let unknown = service.verify_token(Some(&orphan)).await.unwrap_err();
        assert_eq!(unknown.message(), "Not authorized, user not found");
    }
}
