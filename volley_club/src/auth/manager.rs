//! Authentication manager implementation.

use super::models::{AccessTokenClaims, LoginRequest, LoginResponse, Principal, UserId};
use crate::db::repository::{PgUserRepository, UserRepository};
use crate::errors::{ClubError, ClubResult, FieldError};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use std::sync::Arc;

const NO_TOKEN: &str = "No autorizado, no hay token";
const TOKEN_FAILED: &str = "No autorizado, token falló";
const UNKNOWN_PRINCIPAL: &str = "Usuario no encontrado, token inválido";
const BAD_CREDENTIALS: &str = "Credenciales inválidas";

/// Authentication manager
#[derive(Clone)]
pub struct AuthManager {
    users: Arc<dyn UserRepository>,
    pepper: String,
    jwt_secret: String,
    access_token_duration: Duration,
}

impl AuthManager {
    /// Create a new authentication manager
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `pepper` - Server-side pepper for password hashing
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(pool: Arc<PgPool>, pepper: String, jwt_secret: String) -> Self {
        Self::with_repository(Arc::new(PgUserRepository::new(pool)), pepper, jwt_secret)
    }

    /// Create a manager over any user store
    pub fn with_repository(
        users: Arc<dyn UserRepository>,
        pepper: String,
        jwt_secret: String,
    ) -> Self {
        Self {
            users,
            pepper,
            jwt_secret,
            access_token_duration: Duration::minutes(60),
        }
    }

    /// Override the access token lifetime (default one hour)
    pub fn with_token_lifetime(mut self, minutes: i64) -> Self {
        self.access_token_duration = Duration::minutes(minutes);
        self
    }

    /// Resolve the principal behind an `Authorization` header
    ///
    /// # Arguments
    ///
    /// * `authorization` - Raw header value, if the request carried one
    ///
    /// # Errors
    ///
    /// * `ClubError::Unauthenticated` - Header missing or not a bearer token,
    ///   token invalid or expired, or its user no longer exists
    pub async fn authenticate(&self, authorization: Option<&str>) -> ClubResult<Principal> {
        let token = authorization
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ClubError::Unauthenticated(NO_TOKEN.to_string()))?;

        let claims = self.verify_access_token(token)?;

        self.users
            .find_principal(claims.sub)
            .await?
            .ok_or_else(|| ClubError::Unauthenticated(UNKNOWN_PRINCIPAL.to_string()))
    }

    /// Login a user
    ///
    /// # Errors
    ///
    /// * `ClubError::Unauthenticated` - Unknown username or wrong password;
    ///   both cases read the same to the caller
    pub async fn login(&self, request: LoginRequest) -> ClubResult<LoginResponse> {
        let Some(credentials) = self.users.find_credentials(&request.username).await? else {
            log::warn!("Failed login for unknown user: {}", request.username);
            return Err(ClubError::Unauthenticated(BAD_CREDENTIALS.to_string()));
        };

        if !self.verify_password(&request.password, &credentials.password_hash) {
            log::warn!("Failed login for user (wrong password): {}", request.username);
            return Err(ClubError::Unauthenticated(BAD_CREDENTIALS.to_string()));
        }

        let token = self.generate_access_token(credentials.id, &credentials.username)?;
        log::info!("Successful login for user: {}", credentials.username);

        Ok(LoginResponse {
            id: credentials.id,
            username: credentials.username,
            token,
        })
    }

    /// Create a new user account
    ///
    /// # Errors
    ///
    /// * `ClubError::Validation` - Username under 3 characters or password under 8
    /// * `ClubError::DuplicateValue` - Username already exists
    pub async fn create_user(&self, username: &str, password: &str) -> ClubResult<Principal> {
        let username = username.trim();
        let mut errors = Vec::new();
        if username.chars().count() < 3 {
            errors.push(FieldError::new(
                "username",
                "El nombre de usuario debe tener al menos 3 caracteres.",
            ));
        }
        if password.chars().count() < 8 {
            errors.push(FieldError::new(
                "password",
                "La contraseña debe tener al menos 8 caracteres.",
            ));
        }
        if !errors.is_empty() {
            return Err(ClubError::Validation(errors));
        }

        let password_hash = self.hash_password(password)?;
        let id = self.users.create_user(username, &password_hash).await?;
        log::info!("Created user {} ({})", username, id);

        Ok(Principal {
            id,
            username: username.to_string(),
        })
    }

    /// Verify an access token
    ///
    /// # Arguments
    ///
    /// * `token` - JWT access token
    ///
    /// # Returns
    ///
    /// * `ClubResult<AccessTokenClaims>` - Decoded claims or error
    pub fn verify_access_token(&self, token: &str) -> ClubResult<AccessTokenClaims> {
        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            log::debug!("Access token rejected: {}", e);
            ClubError::Unauthenticated(TOKEN_FAILED.to_string())
        })?;

        Ok(token_data.claims)
    }

    /// Hash password with Argon2id + pepper
    fn hash_password(&self, password: &str) -> ClubResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        Ok(argon2
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|e| ClubError::Unexpected(format!("password hashing failed: {e}")))?
            .to_string())
    }

    /// Verify password against hash
    fn verify_password(&self, password: &str, hash: &str) -> bool {
        let peppered = format!("{}{}", password, self.pepper);
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Generate JWT access token
    fn generate_access_token(&self, user_id: UserId, username: &str) -> ClubResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: user_id,
            username: username.to_string(),
            exp: (now + self.access_token_duration).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| ClubError::Unexpected(format!("token signing failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::mock::MockUserRepository;

    const SECRET: &str = "test_jwt_secret_that_is_long_enough_123";

    fn manager() -> (AuthManager, Arc<MockUserRepository>) {
        let repo = Arc::new(MockUserRepository::new());
        let auth = AuthManager::with_repository(
            repo.clone(),
            "test_pepper_value".to_string(),
            SECRET.to_string(),
        );
        (auth, repo)
    }

    fn unauthenticated_message(err: ClubError) -> String {
        match err {
            ClubError::Unauthenticated(message) => message,
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_and_authenticate() {
        let (auth, _) = manager();
        let created = auth.create_user("entrenadora", "voleibol2025").await.unwrap();

        let response = auth
            .login(LoginRequest {
                username: "entrenadora".to_string(),
                password: "voleibol2025".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.id, created.id);

        let header = format!("Bearer {}", response.token);
        let principal = auth.authenticate(Some(&header)).await.unwrap();
        assert_eq!(principal, created);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (auth, _) = manager();
        auth.create_user("entrenadora", "voleibol2025").await.unwrap();

        let wrong_password = auth
            .login(LoginRequest {
                username: "entrenadora".to_string(),
                password: "otra-clave".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_user = auth
            .login(LoginRequest {
                username: "nadie".to_string(),
                password: "voleibol2025".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(unauthenticated_message(wrong_password), BAD_CREDENTIALS);
        assert_eq!(unauthenticated_message(unknown_user), BAD_CREDENTIALS);
    }

    #[tokio::test]
    async fn test_authenticate_without_header() {
        let (auth, _) = manager();
        let err = auth.authenticate(None).await.unwrap_err();
        assert_eq!(unauthenticated_message(err), NO_TOKEN);

        let err = auth.authenticate(Some("Basic abc")).await.unwrap_err();
        assert_eq!(unauthenticated_message(err), NO_TOKEN);
    }

    #[tokio::test]
    async fn test_authenticate_bad_signature() {
        let (auth, _) = manager();
        let principal = auth.create_user("entrenadora", "voleibol2025").await.unwrap();

        let other = AuthManager::with_repository(
            Arc::new(MockUserRepository::new()),
            "pepper".to_string(),
            "a_completely_different_secret_value_42".to_string(),
        );
        let forged = other.generate_access_token(principal.id, &principal.username).unwrap();

        let err = auth
            .authenticate(Some(&format!("Bearer {forged}")))
            .await
            .unwrap_err();
        assert_eq!(unauthenticated_message(err), TOKEN_FAILED);
    }

    #[tokio::test]
    async fn test_authenticate_expired_token() {
        let (auth, _) = manager();
        let principal = auth.create_user("entrenadora", "voleibol2025").await.unwrap();

        let expired = auth.clone().with_token_lifetime(-10);
        let token = expired
            .generate_access_token(principal.id, &principal.username)
            .unwrap();

        let err = auth
            .authenticate(Some(&format!("Bearer {token}")))
            .await
            .unwrap_err();
        assert_eq!(unauthenticated_message(err), TOKEN_FAILED);
    }

    #[tokio::test]
    async fn test_authenticate_deleted_principal() {
        let (auth, repo) = manager();
        let principal = auth.create_user("entrenadora", "voleibol2025").await.unwrap();
        let token = auth
            .generate_access_token(principal.id, &principal.username)
            .unwrap();
        repo.remove(principal.id);

        let err = auth
            .authenticate(Some(&format!("Bearer {token}")))
            .await
            .unwrap_err();
        assert_eq!(unauthenticated_message(err), UNKNOWN_PRINCIPAL);
    }

    #[tokio::test]
    async fn test_create_user_rules() {
        let (auth, _) = manager();
        let err = auth.create_user("ab", "corta").await.unwrap_err();
        assert_eq!(err.field_errors().unwrap().len(), 2);

        auth.create_user("entrenadora", "voleibol2025").await.unwrap();
        let err = auth.create_user("entrenadora", "voleibol2025").await.unwrap_err();
        assert!(matches!(err, ClubError::DuplicateValue(_)));
    }

    #[test]
    fn test_password_hash_is_salted() {
        let (auth, _) = manager();
        let first = auth.hash_password("voleibol2025").unwrap();
        let second = auth.hash_password("voleibol2025").unwrap();
        assert_ne!(first, second);
        assert!(auth.verify_password("voleibol2025", &first));
        assert!(!auth.verify_password("voleibol2026", &first));
    }
}
