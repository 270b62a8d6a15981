//! Tracked packages: model and REST endpoints.

pub mod model;
pub mod routes;

pub use model::{Package, PackageStatus};
pub use routes::package_routes;
