//! `/api/jugadoras` handlers, including tournament assignment.

use std::time::Instant;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use volley_club::players::{AssignmentInput, Player, PlayerInput};
use volley_club::tournaments::Tournament;
use volley_club::validation::{FromBody, ID_MESSAGE, validate_id, validate_relationship, validate_update};

use super::AppState;
use super::error::{ApiResult, JsonBody};
use crate::logging::log_database_operation;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Player>>> {
    Ok(Json(state.players.list().await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Player>> {
    let id = validate_id(&id, ID_MESSAGE)?;
    Ok(Json(state.players.get_by_id(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Player>)> {
    let input = PlayerInput::from_body(&body)?;
    let player = state.players.create(&input).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Player>> {
    let (id, input) = validate_update::<PlayerInput>(&id, ID_MESSAGE, &body)?;
    Ok(Json(state.players.update(id, &input).await?))
}

/// Deletes the player together with her payments, statistics, team and
/// tournament links in one transaction.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let id = validate_id(&id, ID_MESSAGE)?;

    let start = Instant::now();
    state.players.delete(id).await?;
    log_database_operation("DELETE", "jugadoras", start.elapsed().as_millis() as u64);

    Ok(Json(json!({
        "message": "Jugadora y sus registros asociados eliminados correctamente"
    })))
}

pub async fn tournaments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Tournament>>> {
    let id = validate_id(&id, ID_MESSAGE)?;
    Ok(Json(state.players.tournaments(id).await?))
}

pub async fn assign_tournament(
    State(state): State<AppState>,
    Path((player_id, tournament_id)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let (player_id, tournament_id) = validate_relationship(&player_id, &tournament_id)?;
    let input = AssignmentInput::from_body(&body)?;

    state
        .players
        .assign_tournament(player_id, tournament_id, &input)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Jugadora asignada al torneo correctamente" })),
    ))
}

pub async fn unassign_tournament(
    State(state): State<AppState>,
    Path((player_id, tournament_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let (player_id, tournament_id) = validate_relationship(&player_id, &tournament_id)?;
    state
        .players
        .unassign_tournament(player_id, tournament_id)
        .await?;
    Ok(Json(json!({ "message": "Asignación eliminada correctamente" })))
}
