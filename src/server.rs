//! HTTP surface: shared state, router assembly and the service-level routes.

use std::sync::Arc;

use axum::extract::{FromRequest, Request};
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::engine::{DecisionEngine, TrustRegistry};
use crate::error::{ApiError, Result};
use crate::store::{Database, LibSqlBackend};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub engine: Arc<DecisionEngine>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, engine: Arc<DecisionEngine>) -> Self {
        Self { db, engine }
    }
}

/// `Json` extractor whose rejections render as `ApiError`, so malformed
/// bodies get the same `{"detail"}` shape as every other error.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Open the database, build the engine from the configured registry and
/// serve until the listener fails.
pub async fn serve(config: ServiceConfig) -> Result<()> {
    let registry = Arc::new(TrustRegistry::new(config.trust_registry.iter()));
    if registry.is_empty() {
        warn!("Trust registry is empty; every product claim will fail verification");
    }
    info!(approved = registry.len(), "Trust registry loaded");
    let engine = Arc::new(DecisionEngine::new(registry));

    let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_local(&config.db_path).await?);

    let router = app(AppState::new(db, engine), &config);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(
        addr = %config.bind_addr(),
        seed_enabled = config.seed_enabled,
        "Relief Ledger listening"
    );
    axum::serve(listener, router).await?;
    Ok(())
}

/// Build the full application router.
pub fn app(state: AppState, config: &ServiceConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(crate::packages::package_routes())
        .merge(crate::receipts::receipt_routes())
        .merge(crate::dashboard::dashboard_routes());

    if config.seed_enabled {
        router = router.merge(crate::seed::seed_routes());
    }

    router
        .with_state(state)
        .layer(cors_layer(&config.cors_origins))
}

/// CORS for the configured origins; any method, any header.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin: {e}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// GET /
async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "Backend running" }))
}

/// GET /health
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok", "service": "relief-ledger" })),
    )
}
