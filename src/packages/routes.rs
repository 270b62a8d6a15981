//! REST endpoints for packages.
//!
//! Every mutation follows the same shape: fetch, change in memory, write
//! the whole row back with one `update_package` call so the derived
//! fields never go out of step with the signals they came from.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use tracing::info;
use uuid::Uuid;

use super::model::{
    CreatePackage, Package, PackageList, ProcessSignals, UpdatePackageCategory,
    UpdatePackageStatus,
};
use crate::error::ApiError;
use crate::server::{ApiJson, AppState};

/// Build the package REST routes.
pub fn package_routes() -> Router<AppState> {
    Router::new()
        .route("/api/packages", get(list_packages).post(create_package))
        .route("/api/packages/{id}", get(get_package).patch(update_status))
        .route("/api/packages/{id}/process", patch(process_package))
        .route("/api/packages/{id}/category", patch(update_category))
}

/// Load a package by row ID. Malformed IDs are treated as unknown.
async fn fetch_package(state: &AppState, id: &str) -> Result<Package, ApiError> {
    let not_found = || ApiError::NotFound("Package not found".into());
    let id = Uuid::parse_str(id).map_err(|_| not_found())?;
    state
        .db
        .get_package(id)
        .await
        .map_err(|e| ApiError::from_db(e, "Package"))?
        .ok_or_else(not_found)
}

async fn save_package(state: &AppState, package: &Package) -> Result<(), ApiError> {
    state
        .db
        .update_package(package)
        .await
        .map_err(|e| ApiError::from_db(e, "Package"))
}

/// GET /api/packages
async fn list_packages(State(state): State<AppState>) -> Result<Json<PackageList>, ApiError> {
    let packages = state
        .db
        .list_packages()
        .await
        .map_err(|e| ApiError::from_db(e, "Package"))?;
    Ok(Json(PackageList::from(packages)))
}

/// POST /api/packages
///
/// New packages start unclassified; `process` derives the category.
async fn create_package(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreatePackage>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let package = body.into_package();
    state
        .db
        .insert_package(&package)
        .await
        .map_err(|e| ApiError::from_db(e, "Package"))?;

    info!(
        id = %package.id,
        package_id = %package.package_id,
        urgency = %package.urgency,
        "Package created"
    );
    Ok((StatusCode::CREATED, Json(package)))
}

/// GET /api/packages/{id}
async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Package>, ApiError> {
    Ok(Json(fetch_package(&state, &id).await?))
}

/// PATCH /api/packages/{id}
async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdatePackageStatus>,
) -> Result<Json<Package>, ApiError> {
    let mut package = fetch_package(&state, &id).await?;
    package.status = body.status;
    package.touch();
    save_package(&state, &package).await?;

    info!(package_id = %package.package_id, status = %package.status, "Package status updated");
    Ok(Json(package))
}

/// PATCH /api/packages/{id}/process
///
/// Merge supplied signals, resolve the sender verification, then classify
/// and prioritize. The claimed product type is only used for verification.
async fn process_package(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ProcessSignals>,
) -> Result<Json<Package>, ApiError> {
    body.validate()?;
    let mut package = fetch_package(&state, &id).await?;

    body.merge_into(&mut package);
    if let Some(verified) = state
        .engine
        .resolve_verification(body.zk_verified_sender, body.claimed_product_type.as_ref())
    {
        package.zk_verified_sender = Some(verified);
    }

    let decision = state.engine.decide(package.urgency, &package.signals());
    package.apply_decision(decision);
    save_package(&state, &package).await?;

    info!(
        package_id = %package.package_id,
        zk_verified = ?package.zk_verified_sender,
        category = ?package.category,
        priority = ?package.priority_label,
        "Package processed"
    );
    Ok(Json(package))
}

/// PATCH /api/packages/{id}/category
///
/// Manual override; priority is recomputed from the stored urgency.
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdatePackageCategory>,
) -> Result<Json<Package>, ApiError> {
    let mut package = fetch_package(&state, &id).await?;
    let decision = state
        .engine
        .decide_with_category(package.urgency, body.category);
    package.apply_decision(decision);
    save_package(&state, &package).await?;

    info!(
        package_id = %package.package_id,
        category = %body.category,
        priority = ?package.priority_label,
        "Package category overridden"
    );
    Ok(Json(package))
}
