//! Error taxonomy shared by every layer of the library.
//!
//! Repositories translate database failures into these variants instead of
//! leaking raw driver error codes; the HTTP layer renders them exactly once.

use serde::Serialize;
use thiserror::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Club errors
#[derive(Debug, Error)]
pub enum ClubError {
    /// Malformed, missing or out-of-range input. Never reaches the database.
    #[error("Errores de validación")]
    Validation(Vec<FieldError>),

    /// Missing, malformed, expired or unverifiable credential
    #[error("{0}")]
    Unauthenticated(String),

    /// Target entity or relationship does not exist
    #[error("{0}")]
    NotFound(String),

    /// A foreign reference in the payload does not resolve
    #[error("{0}")]
    ReferenceInvalid(String),

    /// A uniqueness constraint was violated
    #[error("{0}")]
    DuplicateValue(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other internal failure (hashing, token signing, ...)
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ClubError {
    /// Get a client-safe error message that doesn't leak internal details
    ///
    /// Database and internal failures collapse to a generic message; every
    /// other variant already carries text meant for the caller.
    pub fn client_message(&self) -> String {
        match self {
            ClubError::Database(_) | ClubError::Unexpected(_) => {
                "¡Algo salió mal en el servidor!".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Field violations, only present for `Validation`.
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            ClubError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// True for failures the caller cannot fix by changing the request.
    pub fn is_internal(&self) -> bool {
        matches!(self, ClubError::Database(_) | ClubError::Unexpected(_))
    }
}

/// Result type for club operations
pub type ClubResult<T> = Result<T, ClubError>;

/// Messages used when a write trips a foreign-key or unique constraint.
///
/// Each repository declares one of these per write path so that the same
/// driver error maps to wording that names the offending reference.
#[derive(Debug, Clone, Copy)]
pub struct WriteConflicts {
    pub reference: &'static str,
    pub duplicate: &'static str,
}

impl WriteConflicts {
    /// Reclassify a failed write into the taxonomy.
    pub fn classify(&self, err: sqlx::Error) -> ClubError {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return ClubError::ReferenceInvalid(self.reference.to_string());
            }
            if db_err.is_unique_violation() {
                return ClubError::DuplicateValue(self.duplicate.to_string());
            }
        }
        ClubError::Database(err)
    }
}
