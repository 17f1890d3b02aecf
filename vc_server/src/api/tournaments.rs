//! `/api/torneos` handlers.

use std::time::Instant;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use volley_club::tournaments::{RosterEntry, Tournament, TournamentInput};
use volley_club::validation::{FromBody, ID_MESSAGE, validate_id, validate_update};

use super::AppState;
use super::error::{ApiResult, JsonBody};
use crate::logging::log_database_operation;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Tournament>>> {
    Ok(Json(state.tournaments.list().await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Tournament>> {
    let id = validate_id(&id, ID_MESSAGE)?;
    Ok(Json(state.tournaments.get_by_id(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Tournament>)> {
    let input = TournamentInput::from_body(&body)?;
    let tournament = state.tournaments.create(&input).await?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Tournament>> {
    let (id, input) = validate_update::<TournamentInput>(&id, ID_MESSAGE, &body)?;
    Ok(Json(state.tournaments.update(id, &input).await?))
}

/// Removes the roster links and detaches matches before deleting.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let id = validate_id(&id, ID_MESSAGE)?;

    let start = Instant::now();
    state.tournaments.delete(id).await?;
    log_database_operation("DELETE", "torneos", start.elapsed().as_millis() as u64);

    Ok(Json(json!({ "message": "Torneo y sus relaciones eliminadas correctamente" })))
}

pub async fn players(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<RosterEntry>>> {
    let id = validate_id(&id, ID_MESSAGE)?;
    Ok(Json(state.tournaments.players(id).await?))
}
