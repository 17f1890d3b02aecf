//! `/api/pagos` handlers.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use volley_club::payments::{Payment, PaymentFilter, PaymentInput};
use volley_club::validation::{FromBody, ID_MESSAGE, validate_id, validate_update};

use super::AppState;
use super::error::{ApiResult, JsonBody};

/// `?jugadoraId=&fechaInicio=&fechaFin=&estado=`, all optional.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Payment>>> {
    let filter = PaymentFilter::from_query(&params);
    Ok(Json(state.payments.list(&filter).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Payment>> {
    let id = validate_id(&id, ID_MESSAGE)?;
    Ok(Json(state.payments.get_by_id(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<Payment>)> {
    let input = PaymentInput::from_body(&body)?;
    let payment = state.payments.create(&input).await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<Payment>> {
    let (id, input) = validate_update::<PaymentInput>(&id, ID_MESSAGE, &body)?;
    Ok(Json(state.payments.update(id, &input).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let id = validate_id(&id, ID_MESSAGE)?;
    state.payments.delete(id).await?;
    Ok(Json(json!({ "message": "Pago eliminado correctamente" })))
}
