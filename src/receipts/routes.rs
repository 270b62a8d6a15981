//! REST endpoints for receipts.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use super::model::{CreateReceipt, Receipt, ReceiptList};
use crate::error::ApiError;
use crate::server::{ApiJson, AppState};

/// Build the receipt REST routes.
pub fn receipt_routes() -> Router<AppState> {
    Router::new().route("/api/receipts", get(list_receipts).post(create_receipt))
}

/// GET /api/receipts
async fn list_receipts(State(state): State<AppState>) -> Result<Json<ReceiptList>, ApiError> {
    let receipts = state
        .db
        .list_receipts()
        .await
        .map_err(|e| ApiError::from_db(e, "Receipt"))?;
    Ok(Json(ReceiptList::from(receipts)))
}

/// POST /api/receipts
async fn create_receipt(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateReceipt>,
) -> Result<impl IntoResponse, ApiError> {
    body.validate()?;
    let harm_score = state.engine.harm_score(body.disaster_type.as_deref());
    let receipt = Receipt::new(
        body.receipt_id,
        body.package_id,
        body.proof_summary,
        body.status,
        body.disaster_type,
        harm_score,
    );
    state
        .db
        .insert_receipt(&receipt)
        .await
        .map_err(|e| ApiError::from_db(e, "Receipt"))?;

    info!(
        receipt_id = %receipt.receipt_id,
        disaster_type = receipt.disaster_type.as_deref().unwrap_or("none"),
        harm_score = receipt.harm_score,
        "Receipt created"
    );
    Ok((StatusCode::CREATED, Json(receipt)))
}
