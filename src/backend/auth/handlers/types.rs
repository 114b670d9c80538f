/**
 * Authentication Handler Types
 *
 * Request and response types used by the register, login and me handlers,
 * and the validation that turns requests into credential-service input.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::users::{normalize_email, User};
use crate::backend::validation::{FieldErrors, Validate};
use crate::shared::FieldError;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// Register request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct RegisterRequest {
    /// User's chosen username (3-30 chars, alphanumeric + underscore)
    #[serde(default)]
    pub username: Option<String>,
    /// User's email address
    #[serde(default)]
    pub email: Option<String>,
    /// User's password (will be hashed before storage)
    #[serde(default)]
    pub password: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    /// Username (an email is also accepted)
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Validated registration input
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    /// Already normalized
    pub email: String,
    pub password: String,
}

/// Validated login input
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Auth response
///
/// Returned by register and login. Contains the JWT token and the public
/// profile for immediate authentication.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    /// JWT token for authentication (30-day expiration)
    pub token: String,
    /// User information (without sensitive data)
    pub user: UserResponse,
}

/// User response (without sensitive data)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    /// User's unique ID (UUID)
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
pub fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Validate for RegisterRequest {
    type Output = RegisterInput;

    fn validate(self) -> Result<RegisterInput, Vec<FieldError>> {
        let mut errors = FieldErrors::new();

        let username = errors.required("username", self.username, "Username is required");
        let username = username.filter(|u| {
            let valid = is_valid_username(u);
            if !valid {
                errors.push(
                    "username",
                    "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
                );
            }
            valid
        });

        let email = errors
            .required("email", self.email, "Email is required")
            .map(|e| normalize_email(&e));
        let email = email.filter(|e| {
            let valid = e.contains('@');
            if !valid {
                errors.push("email", "Invalid email format");
            }
            valid
        });

        let password = match self.password {
            Some(p) if p.len() >= MIN_PASSWORD_LEN => Some(p),
            Some(_) => {
                errors.push("password", "Password must be at least 8 characters");
                None
            }
            None => {
                errors.push("password", "Password is required");
                None
            }
        };

        let input = match (username, email, password) {
            (Some(username), Some(email), Some(password)) => Some(RegisterInput {
                username,
                email,
                password,
            }),
            _ => None,
        };
        errors.into_result(input)
    }
}

impl Validate for LoginRequest {
    type Output = LoginInput;

    fn validate(self) -> Result<LoginInput, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        let username = errors.required("username", self.username, "Username is required");
        let password = match self.password {
            Some(p) if !p.is_empty() => Some(p),
            _ => {
                errors.push("password", "Password is required");
                None
            }
        };

        let input = match (username, password) {
            (Some(username), Some(password)) => Some(LoginInput { username, password }),
            _ => None,
        };
        errors.into_result(input)
    }
}
