//! Authentication middleware for protected endpoints.
//!
//! Resolves the `Authorization: Bearer <token>` header to a [`Principal`] and
//! injects it into request extensions for downstream handlers.
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use volley_club::auth::Principal;
//!
//! async fn protected_handler(Extension(principal): Extension<Principal>) -> String {
//!     format!("Authenticated as {}", principal.username)
//! }
//! # let _ = protected_handler;
//! ```

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use super::{AppState, error::ApiError, request_id::RequestId};
use crate::logging::log_security_event;

/// Authentication middleware that validates JWT tokens and injects the principal.
///
/// # Behavior
///
/// - **Success**: Token valid and user present → Injects `Principal` → Calls next handler
/// - **Missing header / bad format / invalid or expired token / deleted user**: `401 Unauthorized`
pub async fn auth_middleware(
    State(state): State<AppState>,
    request_id: RequestId,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    match state.auth.authenticate(header.as_deref()).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            Ok(next.run(request).await)
        }
        Err(err) => {
            log_security_event(
                "authentication_failed",
                Some(request_id.as_str()),
                &err.to_string(),
            );
            Err(err.into())
        }
    }
}
