//! Dashboard summary metrics.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::server::AppState;
use crate::store::PackageCounts;

/// `GET /api/dashboard/metrics` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub total_packages: u64,
    /// Packages in transit.
    pub active_routes: u64,
    /// Delayed packages.
    pub alerts_count: u64,
    pub completed_deliveries: u64,
}

impl From<PackageCounts> for DashboardMetrics {
    fn from(c: PackageCounts) -> Self {
        Self {
            total_packages: c.total,
            active_routes: c.in_transit,
            alerts_count: c.delayed,
            completed_deliveries: c.delivered,
        }
    }
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/api/dashboard/metrics", get(metrics))
}

async fn metrics(State(state): State<AppState>) -> Result<Json<DashboardMetrics>, ApiError> {
    let counts = state
        .db
        .count_packages()
        .await
        .map_err(|e| ApiError::from_db(e, "Dashboard"))?;
    Ok(Json(counts.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_from_counts() {
        let m = DashboardMetrics::from(PackageCounts {
            total: 6,
            in_transit: 3,
            delivered: 2,
            delayed: 1,
        });
        assert_eq!(m.total_packages, 6);
        assert_eq!(m.active_routes, 3);
        assert_eq!(m.alerts_count, 1);
        assert_eq!(m.completed_deliveries, 2);
    }
}
