//! Guardian persistence.

use super::models::{Guardian, GuardianInput};
use crate::db;
use crate::errors::{ClubError, ClubResult, WriteConflicts};
use sqlx::{PgPool, Row};
use std::sync::Arc;

const CREATE_CONFLICTS: WriteConflicts = WriteConflicts {
    reference: "Referencia inválida en los datos del tutor.",
    duplicate: "El email proporcionado ya está registrado.",
};

const UPDATE_CONFLICTS: WriteConflicts = WriteConflicts {
    reference: "Referencia inválida en los datos del tutor.",
    duplicate: "El email proporcionado ya está registrado por otro tutor.",
};

/// CRUD over `tutores`.
///
/// Deleting a guardian never fails because of dependents: players and
/// payments that reference it have the reference cleared by the schema.
#[derive(Clone)]
pub struct GuardianRepository {
    pool: Arc<PgPool>,
}

impl GuardianRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// All guardians, newest first
    pub async fn list(&self) -> ClubResult<Vec<Guardian>> {
        let guardians =
            sqlx::query_as::<_, Guardian>("SELECT * FROM tutores ORDER BY fecha_creacion DESC, id DESC")
                .fetch_all(self.pool.as_ref())
                .await?;
        Ok(guardians)
    }

    /// Get a guardian by ID
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No guardian with this id
    pub async fn get_by_id(&self, id: i64) -> ClubResult<Guardian> {
        self.find(id)
            .await?
            .ok_or_else(|| ClubError::NotFound("Tutor no encontrado".to_string()))
    }

    async fn find(&self, id: i64) -> ClubResult<Option<Guardian>> {
        let guardian = sqlx::query_as::<_, Guardian>("SELECT * FROM tutores WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(guardian)
    }

    /// Insert a guardian and return the stored row
    ///
    /// # Errors
    ///
    /// * `ClubError::DuplicateValue` - Email already used by another guardian
    pub async fn create(&self, input: &GuardianInput) -> ClubResult<Guardian> {
        let row = sqlx::query(
            r#"
            INSERT INTO tutores (
                nombre, apellido_paterno, apellido_materno, telefono, email,
                direccion, ocupacion, notas, activo
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&input.nombre)
        .bind(&input.apellido_paterno)
        .bind(&input.apellido_materno)
        .bind(&input.telefono)
        .bind(&input.email)
        .bind(&input.direccion)
        .bind(&input.ocupacion)
        .bind(&input.notas)
        .bind(input.activo)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| CREATE_CONFLICTS.classify(e))?;

        let id: i64 = row.get("id");
        self.find(id).await?.ok_or_else(|| {
            ClubError::Unexpected("No se pudo recuperar el tutor después de la inserción.".to_string())
        })
    }

    /// Replace every column of an existing guardian
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No guardian with this id
    /// * `ClubError::DuplicateValue` - Email already used by another guardian
    pub async fn update(&self, id: i64, input: &GuardianInput) -> ClubResult<Guardian> {
        if !db::exists(self.pool.as_ref(), "SELECT id FROM tutores WHERE id = $1", id).await? {
            return Err(ClubError::NotFound("Tutor no encontrado para actualizar".to_string()));
        }

        sqlx::query(
            r#"
            UPDATE tutores SET
                nombre = $1, apellido_paterno = $2, apellido_materno = $3, telefono = $4,
                email = $5, direccion = $6, ocupacion = $7, notas = $8, activo = $9,
                ultima_actualizacion = NOW()
            WHERE id = $10
            "#,
        )
        .bind(&input.nombre)
        .bind(&input.apellido_paterno)
        .bind(&input.apellido_materno)
        .bind(&input.telefono)
        .bind(&input.email)
        .bind(&input.direccion)
        .bind(&input.ocupacion)
        .bind(&input.notas)
        .bind(input.activo)
        .bind(id)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| UPDATE_CONFLICTS.classify(e))?;

        self.find(id).await?.ok_or_else(|| {
            ClubError::Unexpected("No se pudo recuperar el tutor después de la actualización.".to_string())
        })
    }

    /// Delete a guardian
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No guardian with this id
    pub async fn delete(&self, id: i64) -> ClubResult<()> {
        let result = sqlx::query("DELETE FROM tutores WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ClubError::NotFound("Tutor no encontrado para eliminar".to_string()));
        }
        Ok(())
    }
}
