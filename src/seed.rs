//! Demo data for local development and UI walkthroughs.
//!
//! Seeding is additive: rows whose caller-facing ID already exists are
//! skipped, so the endpoints can be hit repeatedly.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{debug, info};

use crate::engine::{DecisionEngine, SenderType, Urgency};
use crate::error::{ApiError, DatabaseError};
use crate::packages::model::{Package, PackageStatus};
use crate::receipts::model::{Receipt, ReceiptStatus};
use crate::server::AppState;

struct DemoPackage {
    package_id: &'static str,
    destination: &'static str,
    urgency: Urgency,
    status: PackageStatus,
    weight: f64,
    fragile: bool,
    sender_type: SenderType,
}

struct DemoReceipt {
    receipt_id: &'static str,
    package_id: &'static str,
    status: ReceiptStatus,
    disaster_type: Option<&'static str>,
    proof_summary: &'static str,
}

const DEMO_PACKAGES: &[DemoPackage] = &[
    DemoPackage {
        package_id: "DEMO-001-HOSPITAL-CRIT",
        destination: "City Hospital, Emergency Ward",
        urgency: Urgency::Critical,
        status: PackageStatus::InTransit,
        weight: 2.5,
        fragile: true,
        sender_type: SenderType::Hospital,
    },
    DemoPackage {
        package_id: "DEMO-002-NGO-CRIT",
        destination: "Relief NGO, Disaster Zone",
        urgency: Urgency::Critical,
        status: PackageStatus::InTransit,
        weight: 8.0,
        fragile: false,
        sender_type: SenderType::Ngo,
    },
    DemoPackage {
        package_id: "DEMO-003-NGO-PREF",
        destination: "Community Health NGO, Rural Center",
        urgency: Urgency::Preferred,
        status: PackageStatus::InTransit,
        weight: 5.5,
        fragile: true,
        sender_type: SenderType::Ngo,
    },
    DemoPackage {
        package_id: "DEMO-004-WAREHOUSE-FLEX",
        destination: "Regional Warehouse, Storage Zone",
        urgency: Urgency::Flexible,
        status: PackageStatus::InTransit,
        weight: 15.0,
        fragile: false,
        sender_type: SenderType::Warehouse,
    },
    DemoPackage {
        package_id: "DEMO-005-RETAIL-DELAYED",
        destination: "Retail Store, Downtown",
        urgency: Urgency::Critical,
        status: PackageStatus::Delayed,
        weight: 3.0,
        fragile: false,
        sender_type: SenderType::Retail,
    },
    DemoPackage {
        package_id: "DEMO-006-LUXURY-DELIVERED",
        destination: "Luxury Boutique, Upscale District",
        urgency: Urgency::Flexible,
        status: PackageStatus::Delivered,
        weight: 1.2,
        fragile: true,
        sender_type: SenderType::Luxury,
    },
    DemoPackage {
        package_id: "DEMO-007-GOVT-CRIT",
        destination: "Government Health Center, Central",
        urgency: Urgency::Critical,
        status: PackageStatus::InTransit,
        weight: 3.5,
        fragile: true,
        sender_type: SenderType::Govt,
    },
    DemoPackage {
        package_id: "DEMO-008-RETAIL-PREF",
        destination: "Fashion Retail, Shopping Mall",
        urgency: Urgency::Preferred,
        status: PackageStatus::InTransit,
        weight: 2.0,
        fragile: false,
        sender_type: SenderType::Retail,
    },
    DemoPackage {
        package_id: "DEMO-009-LUXURY-FLEX",
        destination: "Art Gallery, Cultural Center",
        urgency: Urgency::Flexible,
        status: PackageStatus::InTransit,
        weight: 0.8,
        fragile: true,
        sender_type: SenderType::Luxury,
    },
    DemoPackage {
        package_id: "DEMO-010-NGO-CRIT-MED",
        destination: "Medical NGO, Emergency Response",
        urgency: Urgency::Critical,
        status: PackageStatus::InTransit,
        weight: 4.2,
        fragile: true,
        sender_type: SenderType::Ngo,
    },
];

const DEMO_RECEIPTS: &[DemoReceipt] = &[
    DemoReceipt {
        receipt_id: "RECEIPT-001-HOSPITAL",
        package_id: "DEMO-001-HOSPITAL-CRIT",
        status: ReceiptStatus::Verified,
        disaster_type: Some("flood"),
        proof_summary: "Emergency medical supplies verified by City Hospital. Delivery confirmed with signature from ER Director. Ethically sourced from WHO-approved supplier.",
    },
    DemoReceipt {
        receipt_id: "RECEIPT-002-NGO",
        package_id: "DEMO-002-NGO-CRIT",
        status: ReceiptStatus::Pending,
        disaster_type: Some("earthquake"),
        proof_summary: "Disaster relief supplies awaiting verification. Sent to Relief NGO, verification documents submitted.",
    },
    DemoReceipt {
        receipt_id: "RECEIPT-003-COMMUNITY-NGO",
        package_id: "DEMO-003-NGO-PREF",
        status: ReceiptStatus::Verified,
        disaster_type: Some("cyclone"),
        proof_summary: "Community health supplies verified by Community Health NGO. Rural center received package. Ethical sourcing verified from certified suppliers.",
    },
    DemoReceipt {
        receipt_id: "RECEIPT-004-WAREHOUSE",
        package_id: "DEMO-004-WAREHOUSE-FLEX",
        status: ReceiptStatus::Pending,
        disaster_type: None,
        proof_summary: "Storage facility received goods. Verification in progress for regional warehouse inventory.",
    },
    DemoReceipt {
        receipt_id: "RECEIPT-005-RETAIL",
        package_id: "DEMO-005-RETAIL-DELAYED",
        status: ReceiptStatus::Verified,
        disaster_type: Some("landslide"),
        proof_summary: "Retail store received clothing shipment. Verified delivery with photos. Fair-trade sourcing confirmed.",
    },
    DemoReceipt {
        receipt_id: "RECEIPT-006-LUXURY",
        package_id: "DEMO-006-LUXURY-DELIVERED",
        status: ReceiptStatus::Verified,
        disaster_type: None,
        proof_summary: "Luxury boutique received exclusive collection. Quality inspection completed. Ethically produced by certified artisans.",
    },
    DemoReceipt {
        receipt_id: "RECEIPT-007-GOVT",
        package_id: "DEMO-007-GOVT-CRIT",
        status: ReceiptStatus::Pending,
        disaster_type: Some("flood"),
        proof_summary: "Government health center medical shipment awaiting final verification. Initial inspection passed.",
    },
    DemoReceipt {
        receipt_id: "RECEIPT-008-FASHION",
        package_id: "DEMO-008-RETAIL-PREF",
        status: ReceiptStatus::Verified,
        disaster_type: Some("storm"),
        proof_summary: "Fashion retail received seasonal collection. Verified delivery from ethical supplier. Labor conditions certified as fair.",
    },
    DemoReceipt {
        receipt_id: "RECEIPT-009-GALLERY",
        package_id: "DEMO-009-LUXURY-FLEX",
        status: ReceiptStatus::Verified,
        disaster_type: None,
        proof_summary: "Art gallery received cultural items. Artwork authenticated and ethically sourced from established artists.",
    },
    DemoReceipt {
        receipt_id: "RECEIPT-010-MEDICAL-NGO",
        package_id: "DEMO-010-NGO-CRIT-MED",
        status: ReceiptStatus::Pending,
        disaster_type: Some("earthquake"),
        proof_summary: "Medical emergency supplies sent to NGO emergency response unit. Verification documents being processed.",
    },
];

/// The demo packages, classified and prioritized by `engine`.
pub fn demo_packages(engine: &DecisionEngine) -> Vec<Package> {
    DEMO_PACKAGES
        .iter()
        .map(|d| {
            let mut package = Package::new(d.package_id, d.destination, d.status, d.urgency)
                .with_signals(Some(d.weight), Some(d.fragile), Some(d.sender_type))
                .with_description(format!("Demo package: {}", d.sender_type));
            package.apply_decision(engine.decide(package.urgency, &package.signals()));
            package
        })
        .collect()
}

/// The demo receipts, with harm scores from `engine`.
pub fn demo_receipts(engine: &DecisionEngine) -> Vec<Receipt> {
    DEMO_RECEIPTS
        .iter()
        .map(|d| {
            Receipt::new(
                d.receipt_id,
                d.package_id,
                d.proof_summary,
                d.status,
                d.disaster_type.map(str::to_string),
                engine.harm_score(d.disaster_type),
            )
        })
        .collect()
}

pub fn seed_routes() -> Router<AppState> {
    Router::new()
        .route("/api/seed/packages", post(seed_packages))
        .route("/api/seed/receipts", post(seed_receipts))
}

/// POST /api/seed/packages
///
/// Responds with the packages actually inserted, as a bare array.
async fn seed_packages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let mut created = Vec::new();
    for package in demo_packages(&state.engine) {
        let exists = state
            .db
            .package_id_exists(&package.package_id)
            .await
            .map_err(|e| ApiError::from_db(e, "Package"))?;
        if exists {
            debug!(package_id = %package.package_id, "Demo package exists, skipping");
            continue;
        }
        match state.db.insert_package(&package).await {
            Ok(()) => created.push(package),
            // Inserted concurrently since the existence check.
            Err(DatabaseError::Constraint(_)) => continue,
            Err(e) => return Err(ApiError::from_db(e, "Package")),
        }
    }

    if created.is_empty() {
        return Err(ApiError::Conflict("Demo packages already exist".into()));
    }
    info!(count = created.len(), "Seeded demo packages");
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/seed/receipts
async fn seed_receipts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let mut created = Vec::new();
    for receipt in demo_receipts(&state.engine) {
        let exists = state
            .db
            .receipt_id_exists(&receipt.receipt_id)
            .await
            .map_err(|e| ApiError::from_db(e, "Receipt"))?;
        if exists {
            debug!(receipt_id = %receipt.receipt_id, "Demo receipt exists, skipping");
            continue;
        }
        match state.db.insert_receipt(&receipt).await {
            Ok(()) => created.push(receipt),
            Err(DatabaseError::Constraint(_)) => continue,
            Err(e) => return Err(ApiError::from_db(e, "Receipt")),
        }
    }

    if created.is_empty() {
        return Err(ApiError::Conflict("Demo receipts already exist".into()));
    }
    info!(count = created.len(), "Seeded demo receipts");
    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Category, PriorityLabel};

    #[test]
    fn ten_of_each() {
        let engine = DecisionEngine::default();
        assert_eq!(demo_packages(&engine).len(), 10);
        assert_eq!(demo_receipts(&engine).len(), 10);
    }

    #[test]
    fn receipts_reference_demo_packages() {
        for r in DEMO_RECEIPTS {
            assert!(DEMO_PACKAGES.iter().any(|p| p.package_id == r.package_id));
        }
    }

    #[test]
    fn demo_packages_are_classified_on_signals() {
        let engine = DecisionEngine::default();
        let packages = demo_packages(&engine);
        let by_id = |id: &str| packages.iter().find(|p| p.package_id == id).unwrap();

        // Light fragile hospital parcel.
        let hospital = by_id("DEMO-001-HOSPITAL-CRIT");
        assert_eq!(hospital.category, Some(Category::Medicine));
        assert_eq!(hospital.priority_label, Some(PriorityLabel::High));
        assert!(hospital.zk_verified_sender.is_none());

        let luxury = by_id("DEMO-009-LUXURY-FLEX");
        assert_eq!(luxury.category, Some(Category::Medicine));

        let warehouse = by_id("DEMO-004-WAREHOUSE-FLEX");
        assert_eq!(warehouse.category, Some(Category::Clothes));
        assert_eq!(warehouse.priority_label, Some(PriorityLabel::Low));

        // Heavy, unverified NGO parcel matches no rule.
        let ngo = by_id("DEMO-002-NGO-CRIT");
        assert_eq!(ngo.category, None);
        assert_eq!(ngo.priority_label, None);
    }

    #[test]
    fn demo_receipts_scored_by_disaster() {
        let engine = DecisionEngine::default();
        let receipts = demo_receipts(&engine);
        assert_eq!(receipts[0].harm_score, 90);
        assert_eq!(receipts[1].harm_score, 95);
        assert_eq!(receipts[3].harm_score, 10);
        assert_eq!(receipts[7].harm_score, 70);
    }
}
