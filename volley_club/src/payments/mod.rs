//! Payments (`pagos`).

pub mod models;
pub mod repository;

pub use models::{Payment, PaymentFilter, PaymentInput, PaymentMethod, PaymentStatus};
pub use repository::PaymentRepository;
