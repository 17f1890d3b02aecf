//! Payment persistence.

use super::models::{Payment, PaymentFilter, PaymentInput};
use crate::db;
use crate::errors::{ClubError, ClubResult, WriteConflicts};
use sqlx::{PgPool, Row};
use std::sync::Arc;

const WRITE_CONFLICTS: WriteConflicts = WriteConflicts {
    reference: "El ID de la jugadora o tutor proporcionado no existe.",
    duplicate: "El pago ya está registrado.",
};

const SELECT_PAYMENT: &str = r#"
    SELECT p.*, j.nombre AS jugadora_nombre, j.apellido_paterno AS jugadora_apellido
    FROM pagos p
    JOIN jugadoras j ON p.jugadora_id = j.id
"#;

/// CRUD over `pagos`.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: Arc<PgPool>,
}

impl PaymentRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Payments matching `filter`, latest payment date first
    ///
    /// Absent filter fields match everything.
    pub async fn list(&self, filter: &PaymentFilter) -> ClubResult<Vec<Payment>> {
        let query = format!(
            r#"{SELECT_PAYMENT}
            WHERE ($1::BIGINT IS NULL OR p.jugadora_id = $1)
              AND ($2::DATE IS NULL OR p.fecha_pago >= $2)
              AND ($3::DATE IS NULL OR p.fecha_pago <= $3)
              AND ($4::TEXT IS NULL OR LOWER(p.estado) = $4)
            ORDER BY p.fecha_pago DESC, p.fecha_creacion DESC, p.id DESC
            "#
        );

        let payments = sqlx::query_as::<_, Payment>(&query)
            .bind(filter.jugadora_id)
            .bind(filter.fecha_inicio)
            .bind(filter.fecha_fin)
            .bind(filter.estado.map(|status| status.as_str()))
            .fetch_all(self.pool.as_ref())
            .await?;
        Ok(payments)
    }

    /// Get a payment by ID
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No payment with this id
    pub async fn get_by_id(&self, id: i64) -> ClubResult<Payment> {
        self.find(id)
            .await?
            .ok_or_else(|| ClubError::NotFound("Pago no encontrado".to_string()))
    }

    async fn find(&self, id: i64) -> ClubResult<Option<Payment>> {
        let query = format!("{SELECT_PAYMENT} WHERE p.id = $1");
        let payment = sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(payment)
    }

    /// Insert a payment and return the stored row
    ///
    /// # Errors
    ///
    /// * `ClubError::ReferenceInvalid` - Player or guardian does not exist
    pub async fn create(&self, input: &PaymentInput) -> ClubResult<Payment> {
        let row = sqlx::query(
            r#"
            INSERT INTO pagos (
                jugadora_id, tutor_id, concepto, monto, fecha_pago, metodo_pago,
                referencia, estado, comprobante, notas
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(input.jugadora_id)
        .bind(input.tutor_id)
        .bind(&input.concepto)
        .bind(input.monto)
        .bind(input.fecha_pago)
        .bind(input.metodo_pago.map(|method| method.as_str()))
        .bind(&input.referencia)
        .bind(input.estado.as_str())
        .bind(&input.comprobante)
        .bind(&input.notas)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| WRITE_CONFLICTS.classify(e))?;

        let id: i64 = row.get("id");
        self.find(id).await?.ok_or_else(|| {
            ClubError::Unexpected("No se pudo recuperar el pago después de la inserción.".to_string())
        })
    }

    /// Replace every column of an existing payment
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No payment with this id
    /// * `ClubError::ReferenceInvalid` - Player or guardian does not exist
    pub async fn update(&self, id: i64, input: &PaymentInput) -> ClubResult<Payment> {
        if !db::exists(self.pool.as_ref(), "SELECT id FROM pagos WHERE id = $1", id).await? {
            return Err(ClubError::NotFound("Pago no encontrado para actualizar".to_string()));
        }

        sqlx::query(
            r#"
            UPDATE pagos SET
                jugadora_id = $1, tutor_id = $2, concepto = $3, monto = $4, fecha_pago = $5,
                metodo_pago = $6, referencia = $7, estado = $8, comprobante = $9, notas = $10,
                ultima_actualizacion = NOW()
            WHERE id = $11
            "#,
        )
        .bind(input.jugadora_id)
        .bind(input.tutor_id)
        .bind(&input.concepto)
        .bind(input.monto)
        .bind(input.fecha_pago)
        .bind(input.metodo_pago.map(|method| method.as_str()))
        .bind(&input.referencia)
        .bind(input.estado.as_str())
        .bind(&input.comprobante)
        .bind(&input.notas)
        .bind(id)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| WRITE_CONFLICTS.classify(e))?;

        self.find(id).await?.ok_or_else(|| {
            ClubError::Unexpected("No se pudo recuperar el pago después de la actualización.".to_string())
        })
    }

    /// Delete a payment
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No payment with this id
    pub async fn delete(&self, id: i64) -> ClubResult<()> {
        let result = sqlx::query("DELETE FROM pagos WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ClubError::NotFound("Pago no encontrado para eliminar".to_string()));
        }
        Ok(())
    }
}
