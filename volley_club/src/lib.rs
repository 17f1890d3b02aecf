//! # Volley Club
//!
//! Record management for a youth volleyball club: guardians (`tutores`),
//! players (`jugadoras`), tournaments (`torneos`) and payments (`pagos`).
//!
//! Every write goes through the same pipeline:
//!
//! - **Validation**: the untrusted JSON body is coerced into a typed input and
//!   every field violation is collected before anything touches the database
//! - **Authentication**: a bearer token is verified and resolved to a principal
//! - **Persistence**: a repository runs the write and reclassifies constraint
//!   violations into [`ClubError`] variants
//!
//! Player and tournament deletes run as explicit transactions that clean up
//! dependent rows in a fixed order (see [`db::cascade`]).
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use volley_club::db::{Database, DatabaseConfig};
//! use volley_club::guardians::{GuardianInput, GuardianRepository};
//! use volley_club::validation::FromBody;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()?).await?;
//!     let guardians = GuardianRepository::new(Arc::new(db.pool().clone()));
//!
//!     let input = GuardianInput::from_body(&json!({
//!         "nombre": "Ana",
//!         "apellido_paterno": "Diaz",
//!         "telefono": "5551234567"
//!     }))?;
//!     let guardian = guardians.create(&input).await?;
//!     assert!(guardian.activo);
//!     Ok(())
//! }
//! ```

/// Error taxonomy shared by every layer.
pub mod errors;
pub use errors::{ClubError, ClubResult, FieldError};

/// Request validation and coercion.
pub mod validation;

/// Bearer-token authentication and login.
pub mod auth;

/// Connection pool, schema bootstrap and transactional cascades.
pub mod db;

pub mod guardians;
pub mod payments;
pub mod players;
pub mod tournaments;
