//! Authentication API handlers.
//!
//! Login:
//! ```bash
//! curl -X POST http://localhost:5000/api/auth/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"username": "admin", "password": "secreto123"}'
//! ```
//!
//! Accounts are created offline with the `add_user` binary; the public
//! registration route only reports that it is disabled.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use volley_club::auth::{LoginRequest, LoginResponse, Principal};
use volley_club::validation::FromBody;

use super::AppState;
use super::error::{ApiResult, JsonBody};

/// Exchange credentials for an access token.
///
/// # Request Body
///
/// ```json
/// { "username": "admin", "password": "secreto123" }
/// ```
///
/// # Response
///
/// `200 OK` with `{ "id", "username", "token" }`.
///
/// # Errors
///
/// - `400 Bad Request`: Username or password missing
/// - `401 Unauthorized`: Unknown user or wrong password (same message for both)
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<LoginResponse>> {
    let request = LoginRequest::from_body(&body)?;
    let response = state.auth.login(request).await?;
    Ok(Json(response))
}

/// Self-service registration is disabled.
pub async fn register() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "message": "El registro de usuarios está deshabilitado." })),
    )
}

/// The principal behind the bearer token.
pub async fn me(Extension(principal): Extension<Principal>) -> Json<Principal> {
    Json(principal)
}
