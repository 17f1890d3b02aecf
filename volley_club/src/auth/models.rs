//! Authentication data models.

use crate::validation::{FromBody, TextRule, Validator};
use serde::{Deserialize, Serialize};

/// User ID type
pub type UserId = i64;

/// The authenticated identity attached to a request.
///
/// Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub username: String,
}

/// Stored credentials, only ever read by the login path.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
}

/// User login request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl FromBody for LoginRequest {
    fn collect(v: &mut Validator<'_>) -> Self {
        let username = v.required_text(
            "username",
            TextRule {
                min: 1,
                max: usize::MAX,
                missing: "El nombre de usuario es obligatorio.",
                length: "El nombre de usuario es obligatorio.",
            },
        );
        // Passwords are compared verbatim, so only emptiness is checked.
        let password = v.raw_str("password").unwrap_or_default().to_string();
        if password.is_empty() {
            v.reject("password", "La contraseña es obligatoria.");
        }
        Self { username, password }
    }
}

/// Successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: UserId,
    pub username: String,
    pub token: String,
}

/// JWT claims for access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: UserId,           // User ID
    pub username: String,
    pub exp: i64,              // Expiration timestamp
    pub iat: i64,              // Issued at timestamp
}
