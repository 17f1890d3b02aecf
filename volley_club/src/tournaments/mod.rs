//! Tournaments (`torneos`).

pub mod models;
pub mod repository;

pub use models::{RosterEntry, Tournament, TournamentInput};
pub use repository::TournamentRepository;
