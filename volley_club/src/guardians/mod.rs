//! Guardians (`tutores`).

pub mod models;
pub mod repository;

pub use models::{GUARDIAN_ID_MESSAGE, Guardian, GuardianInput};
pub use repository::GuardianRepository;
