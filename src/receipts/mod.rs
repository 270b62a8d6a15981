//! Delivery receipts: model and REST endpoints.

pub mod model;
pub mod routes;

pub use model::{Receipt, ReceiptStatus};
pub use routes::receipt_routes;
