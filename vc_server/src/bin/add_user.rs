//! Create an API user. Registration over HTTP is disabled, so this is the
//! only way to provision credentials.

use std::sync::Arc;

use anyhow::{Context, Error, bail};
use pico_args::Arguments;
use vc_server::config::ServerConfig;
use volley_club::{
    auth::AuthManager,
    db::{Database, schema},
};

const HELP: &str = "\
Create a user for the volleyball club API

USAGE:
  add_user [OPTIONS] <USERNAME> <PASSWORD>

OPTIONS:
  --db-url     URL         Database connection string  [default: env DATABASE_URL]

FLAGS:
  -h, --help               Print help information

Requires JWT_SECRET and PASSWORD_PEPPER; the pepper must match the server's.
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let database_url: Option<String> = pargs.opt_value_from_str("--db-url")?;
    let username: String = pargs.free_from_str().context("Missing <USERNAME>")?;
    let password: String = pargs.free_from_str().context("Missing <PASSWORD>")?;

    let leftover = pargs.finish();
    if !leftover.is_empty() {
        bail!("Unexpected arguments: {:?}", leftover);
    }

    let config = ServerConfig::from_env(None, database_url)?;
    let db = Database::new(&config.database)
        .await
        .context("Failed to connect to database")?;
    schema::initialize(db.pool())
        .await
        .context("Failed to initialize database schema")?;

    let auth = AuthManager::new(
        Arc::new(db.pool().clone()),
        config.security.password_pepper,
        config.security.jwt_secret,
    );

    let principal = match auth.create_user(&username, &password).await {
        Ok(principal) => principal,
        Err(err) => {
            let detail = match err.field_errors() {
                Some(errors) => errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
                None => err.to_string(),
            };
            bail!("Could not create user '{username}': {detail}");
        }
    };

    println!("Created user '{}' with id {}", principal.username, principal.id);
    db.close().await;
    Ok(())
}
