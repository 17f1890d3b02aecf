//! Volleyball club records API server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use tracing::info;
use vc_server::{api, config::ServerConfig, logging};
use volley_club::{
    auth::AuthManager,
    db::{Database, schema},
};

const HELP: &str = "\
Run the volleyball club records API server

USAGE:
  vc_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:5000]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/volley_club]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:5000)
  DATABASE_URL             PostgreSQL connection string
  JWT_SECRET               JWT signing secret (required, 32+ chars)
  PASSWORD_PEPPER          Password hashing pepper (required, 16+ chars)
  JWT_EXPIRATION_MINUTES   Access token lifetime [default: 60]
  APP_ENV                  'development' exposes internal error detail
  (See .env.example for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let database_url: Option<String> = pargs.opt_value_from_str("--db-url")?;

    logging::init();

    let config = ServerConfig::from_env(bind, database_url)?;
    info!("Starting volleyball club server at {}", config.bind);

    let db = Database::new(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected successfully");

    schema::initialize(db.pool())
        .await
        .context("Failed to initialize database schema")?;

    let pool = Arc::new(db.pool().clone());
    let auth = Arc::new(
        AuthManager::new(
            pool.clone(),
            config.security.password_pepper.clone(),
            config.security.jwt_secret.clone(),
        )
        .with_token_lifetime(config.jwt_expiration_minutes),
    );

    if config.is_development() {
        tracing::warn!("APP_ENV=development: internal error details will be sent to clients");
    }

    let state = api::AppState::new(pool, auth, config.is_development());
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    db.close().await;

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
