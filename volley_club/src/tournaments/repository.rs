//! Tournament persistence.

use super::models::{RosterEntry, Tournament, TournamentInput};
use crate::db::{self, cascade::TOURNAMENT_CASCADE};
use crate::errors::{ClubError, ClubResult};
use sqlx::{PgPool, Row};
use std::sync::Arc;

/// CRUD over `torneos`.
#[derive(Clone)]
pub struct TournamentRepository {
    pool: Arc<PgPool>,
}

impl TournamentRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// All tournaments, latest start first
    pub async fn list(&self) -> ClubResult<Vec<Tournament>> {
        let tournaments =
            sqlx::query_as::<_, Tournament>("SELECT * FROM torneos ORDER BY fecha_inicio DESC, id DESC")
                .fetch_all(self.pool.as_ref())
                .await?;
        Ok(tournaments)
    }

    /// Get a tournament by ID
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No tournament with this id
    pub async fn get_by_id(&self, id: i64) -> ClubResult<Tournament> {
        self.find(id)
            .await?
            .ok_or_else(|| ClubError::NotFound("Torneo no encontrado".to_string()))
    }

    async fn find(&self, id: i64) -> ClubResult<Option<Tournament>> {
        let tournament = sqlx::query_as::<_, Tournament>("SELECT * FROM torneos WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(tournament)
    }

    /// Insert a tournament and return the stored row
    pub async fn create(&self, input: &TournamentInput) -> ClubResult<Tournament> {
        let row = sqlx::query(
            r#"
            INSERT INTO torneos (
                nombre, ubicacion, fecha_inicio, fecha_fin, descripcion, organizador, costo, notas
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&input.nombre)
        .bind(&input.ubicacion)
        .bind(input.fecha_inicio)
        .bind(input.fecha_fin)
        .bind(&input.descripcion)
        .bind(&input.organizador)
        .bind(input.costo)
        .bind(&input.notas)
        .fetch_one(self.pool.as_ref())
        .await?;

        let id: i64 = row.get("id");
        self.find(id).await?.ok_or_else(|| {
            ClubError::Unexpected("No se pudo recuperar el torneo después de la inserción.".to_string())
        })
    }

    /// Replace every column of an existing tournament
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No tournament with this id
    pub async fn update(&self, id: i64, input: &TournamentInput) -> ClubResult<Tournament> {
        if !db::exists(self.pool.as_ref(), "SELECT id FROM torneos WHERE id = $1", id).await? {
            return Err(ClubError::NotFound("Torneo no encontrado para actualizar".to_string()));
        }

        sqlx::query(
            r#"
            UPDATE torneos SET
                nombre = $1, ubicacion = $2, fecha_inicio = $3, fecha_fin = $4,
                descripcion = $5, organizador = $6, costo = $7, notas = $8,
                ultima_actualizacion = NOW()
            WHERE id = $9
            "#,
        )
        .bind(&input.nombre)
        .bind(&input.ubicacion)
        .bind(input.fecha_inicio)
        .bind(input.fecha_fin)
        .bind(&input.descripcion)
        .bind(&input.organizador)
        .bind(input.costo)
        .bind(&input.notas)
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        self.find(id).await?.ok_or_else(|| {
            ClubError::Unexpected("No se pudo recuperar el torneo después de la actualización.".to_string())
        })
    }

    /// Delete a tournament, its roster links, and detach its matches
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No tournament with this id
    pub async fn delete(&self, id: i64) -> ClubResult<()> {
        if !db::exists(self.pool.as_ref(), "SELECT id FROM torneos WHERE id = $1", id).await? {
            return Err(ClubError::NotFound(TOURNAMENT_CASCADE.not_found.to_string()));
        }
        db::delete_with_cascade(self.pool.as_ref(), &TOURNAMENT_CASCADE, id).await
    }

    /// Players assigned to a tournament, by surname then name
    pub async fn players(&self, tournament_id: i64) -> ClubResult<Vec<RosterEntry>> {
        let roster = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT j.id, j.nombre, j.apellido_paterno, j.apellido_materno, j.categoria
            FROM jugadoras j
            JOIN jugadora_torneo jt ON j.id = jt.jugadora_id
            WHERE jt.torneo_id = $1
            ORDER BY j.apellido_paterno ASC, j.nombre ASC
            "#,
        )
        .bind(tournament_id)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(roster)
    }
}
