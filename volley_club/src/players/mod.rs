//! Players (`jugadoras`) and their tournament assignments.

pub mod models;
pub mod repository;

pub use models::{AssignmentInput, Player, PlayerInput};
pub use repository::PlayerRepository;
