//! Player persistence and tournament assignments.

use super::models::{AssignmentInput, Player, PlayerInput};
use crate::db::{self, cascade::PLAYER_CASCADE};
use crate::errors::{ClubError, ClubResult, WriteConflicts};
use crate::tournaments::Tournament;
use sqlx::{PgPool, Row};
use std::sync::Arc;

const WRITE_CONFLICTS: WriteConflicts = WriteConflicts {
    reference: "El ID del tutor proporcionado no existe.",
    duplicate: "El email proporcionado ya está registrado para otra jugadora.",
};

const ASSIGN_CONFLICTS: WriteConflicts = WriteConflicts {
    reference: "La jugadora o el torneo especificado no existe.",
    duplicate: "La jugadora ya está asignada a este torneo",
};

/// CRUD over `jugadoras` plus the `jugadora_torneo` junction.
#[derive(Clone)]
pub struct PlayerRepository {
    pool: Arc<PgPool>,
}

impl PlayerRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// All players by surname, then name
    pub async fn list(&self) -> ClubResult<Vec<Player>> {
        let players = sqlx::query_as::<_, Player>(
            "SELECT * FROM jugadoras ORDER BY apellido_paterno ASC, nombre ASC, id ASC",
        )
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(players)
    }

    /// Get a player by ID
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No player with this id
    pub async fn get_by_id(&self, id: i64) -> ClubResult<Player> {
        self.find(id)
            .await?
            .ok_or_else(|| ClubError::NotFound("Jugadora no encontrada".to_string()))
    }

    async fn find(&self, id: i64) -> ClubResult<Option<Player>> {
        let player = sqlx::query_as::<_, Player>("SELECT * FROM jugadoras WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        Ok(player)
    }

    /// Insert a player and return the stored row
    ///
    /// # Errors
    ///
    /// * `ClubError::ReferenceInvalid` - A guardian id does not exist
    /// * `ClubError::DuplicateValue` - Email already used by another player
    pub async fn create(&self, input: &PlayerInput) -> ClubResult<Player> {
        let row = sqlx::query(
            r#"
            INSERT INTO jugadoras (
                nombre, apellido_paterno, apellido_materno, fecha_nacimiento, categoria,
                posicion, numero_uniforme, altura, peso, tutor_id, tutor_secundario_id,
                telefono, email, direccion, escuela, grado_escolar, alergias,
                condiciones_medicas, notas, activo, fecha_ingreso
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21
            )
            RETURNING id
            "#,
        )
        .bind(&input.nombre)
        .bind(&input.apellido_paterno)
        .bind(&input.apellido_materno)
        .bind(input.fecha_nacimiento)
        .bind(&input.categoria)
        .bind(&input.posicion)
        .bind(input.numero_uniforme)
        .bind(input.altura)
        .bind(input.peso)
        .bind(input.tutor_id)
        .bind(input.tutor_secundario_id)
        .bind(&input.telefono)
        .bind(&input.email)
        .bind(&input.direccion)
        .bind(&input.escuela)
        .bind(&input.grado_escolar)
        .bind(&input.alergias)
        .bind(&input.condiciones_medicas)
        .bind(&input.notas)
        .bind(input.activo)
        .bind(input.fecha_ingreso)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| WRITE_CONFLICTS.classify(e))?;

        let id: i64 = row.get("id");
        self.find(id).await?.ok_or_else(|| {
            ClubError::Unexpected("No se pudo recuperar la jugadora después de la inserción.".to_string())
        })
    }

    /// Replace every column of an existing player
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No player with this id
    /// * `ClubError::ReferenceInvalid` - A guardian id does not exist
    /// * `ClubError::DuplicateValue` - Email already used by another player
    pub async fn update(&self, id: i64, input: &PlayerInput) -> ClubResult<Player> {
        if !db::exists(self.pool.as_ref(), "SELECT id FROM jugadoras WHERE id = $1", id).await? {
            return Err(ClubError::NotFound(
                "Jugadora no encontrada para actualizar".to_string(),
            ));
        }

        sqlx::query(
            r#"
            UPDATE jugadoras SET
                nombre = $1, apellido_paterno = $2, apellido_materno = $3,
                fecha_nacimiento = $4, categoria = $5, posicion = $6, numero_uniforme = $7,
                altura = $8, peso = $9, tutor_id = $10, tutor_secundario_id = $11,
                telefono = $12, email = $13, direccion = $14, escuela = $15,
                grado_escolar = $16, alergias = $17, condiciones_medicas = $18, notas = $19,
                activo = $20, fecha_ingreso = $21, ultima_actualizacion = NOW()
            WHERE id = $22
            "#,
        )
        .bind(&input.nombre)
        .bind(&input.apellido_paterno)
        .bind(&input.apellido_materno)
        .bind(input.fecha_nacimiento)
        .bind(&input.categoria)
        .bind(&input.posicion)
        .bind(input.numero_uniforme)
        .bind(input.altura)
        .bind(input.peso)
        .bind(input.tutor_id)
        .bind(input.tutor_secundario_id)
        .bind(&input.telefono)
        .bind(&input.email)
        .bind(&input.direccion)
        .bind(&input.escuela)
        .bind(&input.grado_escolar)
        .bind(&input.alergias)
        .bind(&input.condiciones_medicas)
        .bind(&input.notas)
        .bind(input.activo)
        .bind(input.fecha_ingreso)
        .bind(id)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| WRITE_CONFLICTS.classify(e))?;

        self.find(id).await?.ok_or_else(|| {
            ClubError::Unexpected(
                "No se pudo recuperar la jugadora después de la actualización.".to_string(),
            )
        })
    }

    /// Delete a player together with its payments, match statistics, team
    /// links and tournament links
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - No player with this id, including when a
    ///   concurrent delete removed it first
    pub async fn delete(&self, id: i64) -> ClubResult<()> {
        if !db::exists(self.pool.as_ref(), "SELECT id FROM jugadoras WHERE id = $1", id).await? {
            return Err(ClubError::NotFound(PLAYER_CASCADE.not_found.to_string()));
        }
        db::delete_with_cascade(self.pool.as_ref(), &PLAYER_CASCADE, id).await
    }

    /// Tournaments the player is assigned to, latest first
    ///
    /// An unknown player simply has no tournaments.
    pub async fn tournaments(&self, player_id: i64) -> ClubResult<Vec<Tournament>> {
        let tournaments = sqlx::query_as::<_, Tournament>(
            r#"
            SELECT t.*
            FROM torneos t
            JOIN jugadora_torneo jt ON t.id = jt.torneo_id
            WHERE jt.jugadora_id = $1
            ORDER BY t.fecha_inicio DESC, t.id DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(self.pool.as_ref())
        .await?;
        Ok(tournaments)
    }

    /// Assign a player to a tournament
    ///
    /// # Errors
    ///
    /// * `ClubError::ReferenceInvalid` - Player or tournament does not exist
    /// * `ClubError::DuplicateValue` - Pair already assigned
    pub async fn assign_tournament(
        &self,
        player_id: i64,
        tournament_id: i64,
        input: &AssignmentInput,
    ) -> ClubResult<()> {
        sqlx::query("INSERT INTO jugadora_torneo (jugadora_id, torneo_id, notas) VALUES ($1, $2, $3)")
            .bind(player_id)
            .bind(tournament_id)
            .bind(&input.notas)
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| ASSIGN_CONFLICTS.classify(e))?;

        log::info!("Assigned player {} to tournament {}", player_id, tournament_id);
        Ok(())
    }

    /// Remove a player from a tournament
    ///
    /// # Errors
    ///
    /// * `ClubError::NotFound` - The pair was not assigned
    pub async fn unassign_tournament(&self, player_id: i64, tournament_id: i64) -> ClubResult<()> {
        let result = sqlx::query("DELETE FROM jugadora_torneo WHERE jugadora_id = $1 AND torneo_id = $2")
            .bind(player_id)
            .bind(tournament_id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(ClubError::NotFound("Asignación no encontrada".to_string()));
        }
        Ok(())
    }
}
