//! HTTP server for the volleyball club records backend.
//!
//! Wires the [`volley_club`] repositories and authentication gate into an
//! axum router. The binary in `main.rs` only loads configuration and serves
//! [`api::create_router`]; everything else lives here so integration tests
//! can drive the router directly.

pub mod api;
pub mod config;
pub mod logging;
