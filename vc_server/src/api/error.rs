//! Rendering of [`ClubError`] as HTTP responses.
//!
//! Every handler returns [`ApiResult`]; the error side is rendered here and
//! nowhere else, as `{ "message": ..., "errors": [{ "field", "message" }] }`.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::{Value, json};
use volley_club::{ClubError, FieldError};

use super::{AppState, request_id::RequestId};

/// Message reported on field `body` when the request body is not JSON.
pub const MALFORMED_BODY: &str = "El cuerpo de la solicitud debe ser JSON válido.";

/// HTTP-facing wrapper around [`ClubError`].
#[derive(Debug)]
pub struct ApiError(pub ClubError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ClubError> for ApiError {
    fn from(err: ClubError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClubError::Validation(_) | ClubError::ReferenceInvalid(_) => StatusCode::BAD_REQUEST,
            ClubError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ClubError::NotFound(_) => StatusCode::NOT_FOUND,
            ClubError::DuplicateValue(_) => StatusCode::CONFLICT,
            ClubError::Database(_) | ClubError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Raw text of an internal failure, attached to the 500 response so that
/// [`expose_internal_errors`] can surface it in development.
#[derive(Debug, Clone)]
pub struct InternalDetail(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({ "message": self.0.client_message() });
        if let Some(errors) = self.0.field_errors() {
            body["errors"] = json!(errors);
        }

        let mut response = (status, Json(body)).into_response();
        if self.0.is_internal() {
            response
                .extensions_mut()
                .insert(InternalDetail(self.0.to_string()));
        }
        response
    }
}

/// Log internal failures against their request id and, in development, swap
/// the generic 500 message for the underlying error.
pub async fn expose_internal_errors(
    State(state): State<AppState>,
    request_id: RequestId,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    let Some(InternalDetail(detail)) = response.extensions().get::<InternalDetail>() else {
        return response;
    };

    tracing::error!(request_id = %request_id.as_str(), error = %detail, "Request failed");
    if state.expose_errors {
        (response.status(), Json(json!({ "message": detail }))).into_response()
    } else {
        response
    }
}

/// JSON request body as an untyped value, ready for a [`volley_club::validation::Validator`].
///
/// An empty body reads as `null` so that every field is simply missing.
/// Unparseable JSON is a validation failure on field `body`.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| malformed_body())?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(Value::Null));
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|_| malformed_body())
    }
}

fn malformed_body() -> ApiError {
    ApiError(ClubError::Validation(vec![FieldError::new("body", MALFORMED_BODY)]))
}
