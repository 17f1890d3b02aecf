//! Repository trait definitions for testability and dependency injection.
//!
//! The authentication gate resolves principals through [`UserRepository`] so
//! that it can be exercised against an in-memory store in unit tests.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use crate::auth::{Credentials, Principal, UserId};
use crate::errors::{ClubResult, WriteConflicts};

const USER_CONFLICTS: WriteConflicts = WriteConflicts {
    reference: "Referencia de usuario inválida.",
    duplicate: "El nombre de usuario ya está registrado.",
};

/// Trait for user/authentication repository operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user, returning its id
    async fn create_user(&self, username: &str, password_hash: &str) -> ClubResult<UserId>;

    /// Find credentials by username
    async fn find_credentials(&self, username: &str) -> ClubResult<Option<Credentials>>;

    /// Find principal by ID
    async fn find_principal(&self, user_id: UserId) -> ClubResult<Option<Principal>>;
}

/// Default PostgreSQL implementation of `UserRepository`
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, username: &str, password_hash: &str) -> ClubResult<UserId> {
        let row = sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id")
            .bind(username)
            .bind(password_hash)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| USER_CONFLICTS.classify(e))?;

        Ok(row.get("id"))
    }

    async fn find_credentials(&self, username: &str) -> ClubResult<Option<Credentials>> {
        let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(|r| Credentials {
            id: r.get("id"),
            username: r.get("username"),
            password_hash: r.get("password_hash"),
        }))
    }

    async fn find_principal(&self, user_id: UserId) -> ClubResult<Option<Principal>> {
        let row = sqlx::query("SELECT id, username FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(|r| Principal {
            id: r.get("id"),
            username: r.get("username"),
        }))
    }
}
