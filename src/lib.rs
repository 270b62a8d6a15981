//! Relief Ledger: package classification, prioritization and delivery
//! receipts for disaster relief logistics.

pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod packages;
pub mod receipts;
pub mod seed;
pub mod server;
pub mod store;
