//! Persistence layer: libSQL-backed storage for packages and receipts.

pub mod libsql_backend;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{Database, PackageCounts};
