//! Authentication gate: bearer-token verification and login.
//!
//! - Argon2id password hashing with server-side pepper
//! - HS256 JWT access tokens (configurable lifetime, one hour by default)
//! - Principal resolution against the `users` table on every request
//!
//! ## Example
//!
//! ```no_run
//! use volley_club::auth::{AuthManager, LoginRequest};
//! use volley_club::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let auth = AuthManager::new(
//!         Arc::new(db.pool().clone()),
//!         "secret_pepper".to_string(),
//!         "jwt_secret".to_string(),
//!     );
//!
//!     let login = auth
//!         .login(LoginRequest {
//!             username: "entrenadora".to_string(),
//!             password: "voleibol2025".to_string(),
//!         })
//!         .await?;
//!     let principal = auth.authenticate(Some(&format!("Bearer {}", login.token))).await?;
//!     println!("Authenticated as {}", principal.username);
//!     Ok(())
//! }
//! ```

pub mod manager;
pub mod models;

pub use manager::AuthManager;
pub use models::{AccessTokenClaims, Credentials, LoginRequest, LoginResponse, Principal, UserId};
