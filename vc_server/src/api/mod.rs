//! HTTP API for the volleyball club records backend.
//!
//! # Modules
//!
//! - [`auth`]: Login, disabled registration, current principal
//! - [`guardians`], [`players`], [`tournaments`], [`payments`]: Entity CRUD
//! - [`middleware`]: Bearer-token authentication for protected endpoints
//! - [`request_id`]: Request correlation
//! - [`error`]: Rendering of library errors and JSON body extraction
//!
//! # Endpoints Overview
//!
//! ```text
//! GET    /api/status                                    - Health check (public)
//! POST   /api/auth/login                                - Login (public)
//! POST   /api/auth/register                             - Always 403 (public)
//! GET    /api/auth/me                                   - Current principal
//! GET    /api/{tutores,jugadoras,torneos,pagos}         - List
//! POST   /api/{tutores,jugadoras,torneos,pagos}         - Create (201)
//! GET    /api/{tutores,jugadoras,torneos,pagos}/{id}    - Read
//! PUT    /api/{tutores,jugadoras,torneos,pagos}/{id}    - Full replace
//! DELETE /api/{tutores,jugadoras,torneos,pagos}/{id}    - Delete
//! GET    /api/jugadoras/{id}/torneos                    - Tournaments of a player
//! POST   /api/jugadoras/{jugadoraId}/torneos/{torneoId} - Assign (201)
//! DELETE /api/jugadoras/{jugadoraId}/torneos/{torneoId} - Unassign
//! GET    /api/torneos/{id}/jugadoras                    - Roster of a tournament
//! ```
//!
//! Everything except status, login and register requires
//! `Authorization: Bearer <token>`.

pub mod auth;
pub mod error;
pub mod guardians;
pub mod middleware;
pub mod payments;
pub mod players;
pub mod request_id;
pub mod tournaments;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use volley_club::{
    auth::AuthManager, guardians::GuardianRepository, payments::PaymentRepository,
    players::PlayerRepository, tournaments::TournamentRepository,
};

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; every field shares the one pool created at startup.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthManager>,
    pub guardians: GuardianRepository,
    pub players: PlayerRepository,
    pub tournaments: TournamentRepository,
    pub payments: PaymentRepository,
    pub pool: Arc<PgPool>,
    /// Render internal error text on 500 responses (development only).
    pub expose_errors: bool,
}

impl AppState {
    /// Build every repository over `pool`.
    pub fn new(pool: Arc<PgPool>, auth: Arc<AuthManager>, expose_errors: bool) -> Self {
        Self {
            auth,
            guardians: GuardianRepository::new(pool.clone()),
            players: PlayerRepository::new(pool.clone()),
            tournaments: TournamentRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool.clone()),
            pool,
            expose_errors,
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use vc_server::api::{create_router, AppState};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let state: AppState = unimplemented!();
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router(state.clone()))
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            error::expose_internal_errors,
        ))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/status", get(status))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/tutores", get(guardians::list).post(guardians::create))
        .route(
            "/tutores/{id}",
            get(guardians::get)
                .put(guardians::update)
                .delete(guardians::delete),
        )
        .route("/jugadoras", get(players::list).post(players::create))
        .route(
            "/jugadoras/{id}",
            get(players::get).put(players::update).delete(players::delete),
        )
        .route("/jugadoras/{id}/torneos", get(players::tournaments))
        .route(
            "/jugadoras/{id}/torneos/{torneo_id}",
            post(players::assign_tournament).delete(players::unassign_tournament),
        )
        .route("/torneos", get(tournaments::list).post(tournaments::create))
        .route(
            "/torneos/{id}",
            get(tournaments::get)
                .put(tournaments::update)
                .delete(tournaments::delete),
        )
        .route("/torneos/{id}/jugadoras", get(tournaments::players))
        .route("/pagos", get(payments::list).post(payments::create))
        .route(
            "/pagos/{id}",
            get(payments::get).put(payments::update).delete(payments::delete),
        )
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ));

    Router::new().merge(public_routes).merge(protected_routes)
}

/// Health check with a database ping.
///
/// ```bash
/// curl http://localhost:5000/api/status
/// # {"status":"API Voleibol Manager funcionando!","database":true,"version":"0.1.0"}
/// ```
async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let database = sqlx::query("SELECT 1")
        .fetch_one(state.pool.as_ref())
        .await
        .is_ok();

    Json(json!({
        "status": "API Voleibol Manager funcionando!",
        "database": database,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Ruta no encontrada" })),
    )
}
