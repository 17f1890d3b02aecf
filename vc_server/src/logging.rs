//! Structured logging configuration.
//!
//! Library code logs through the `log` facade; `init` installs a tracing
//! subscriber that also captures those records.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Deletes slower than this are reported at `warn`.
pub const SLOW_OPERATION_MS: u64 = 100;

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use vc_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log security event with structured data
///
/// # Arguments
///
/// * `event_type` - Type of security event
/// * `request_id` - Optional request correlation ID
/// * `message` - Event message
///
/// # Example
///
/// ```
/// use vc_server::logging::log_security_event;
///
/// log_security_event(
///     "rejected_token",
///     Some("5d1c0d6e-8a43-4f55-9a4b-3d7b1b8b52c1"),
///     "No autorizado, token falló"
/// );
/// ```
pub fn log_security_event(
    event_type: &str,
    request_id: Option<&str>,
    message: &str,
) {
    tracing::warn!(
        event_type = event_type,
        request_id = request_id,
        "SECURITY: {}",
        message
    );
}

/// Log database operation
///
/// # Arguments
///
/// * `query_type` - Type of query (SELECT, INSERT, UPDATE, DELETE)
/// * `table` - Table name
/// * `duration_ms` - Duration in milliseconds
pub fn log_database_operation(query_type: &str, table: &str, duration_ms: u64) {
    tracing::debug!(
        query_type = query_type,
        table = table,
        duration_ms = duration_ms,
        "Database operation"
    );

    if duration_ms > SLOW_OPERATION_MS {
        tracing::warn!(
            query_type = query_type,
            table = table,
            duration_ms = duration_ms,
            "Slow database query detected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_security_event() {
        // Just ensure it doesn't panic
        log_security_event("test_event", Some("req-1"), "Test message");
        log_security_event("test_event", None, "Test message");
    }

    #[test]
    fn test_log_database_operation() {
        log_database_operation("DELETE", "jugadoras", 50);
        log_database_operation("DELETE", "torneos", 150);
    }
}
