//! `/api/tutores` handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use volley_club::guardians::{GUARDIAN_ID_MESSAGE, Guardian, GuardianInput};
use volley_club::validation::{FromBody, validate_id, validate_update};

use super::AppState;
use super::error::{ApiResult, JsonBody};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Guardian>>> {
    Ok(Json(state.guardians.list().await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Guardian>> {
    let id = validate_id(&id, GUARDIAN_ID_MESSAGE)?;
    Ok(Json(state.guardians.get_by_id(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Guardian>)> {
    let input = GuardianInput::from_body(&body)?;
    let guardian = state.guardians.create(&input).await?;
    Ok((StatusCode::CREATED, Json(guardian)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Guardian>> {
    let (id, input) = validate_update::<GuardianInput>(&id, GUARDIAN_ID_MESSAGE, &body)?;
    Ok(Json(state.guardians.update(id, &input).await?))
}

/// Players keep existing; their `tutor_id` is cleared by the schema.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let id = validate_id(&id, GUARDIAN_ID_MESSAGE)?;
    state.guardians.delete(id).await?;
    Ok(Json(json!({ "message": "Tutor eliminado correctamente" })))
}
