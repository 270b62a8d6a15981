//! Receipt data model: proof of delivery with a harm score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::packages::model::require_non_empty;

/// Verification state of a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Verified,
    Pending,
}

impl ReceiptStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Pending => "pending",
        }
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReceiptStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verified" => Ok(Self::Verified),
            "pending" => Ok(Self::Pending),
            _ => Err(format!("Unknown receipt status: {}", s)),
        }
    }
}

/// A delivery receipt. `harm_score` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    pub receipt_id: String,
    /// Caller-facing package identifier (not the package row ID).
    pub package_id: String,
    pub proof_summary: String,
    pub status: ReceiptStatus,
    /// As supplied by the caller.
    pub disaster_type: Option<String>,
    /// 0–100.
    pub harm_score: u8,
    pub timestamp: DateTime<Utc>,
}

impl Receipt {
    /// The harm score is taken as computed; callers get it from the
    /// severity lookup.
    pub fn new(
        receipt_id: impl Into<String>,
        package_id: impl Into<String>,
        proof_summary: impl Into<String>,
        status: ReceiptStatus,
        disaster_type: Option<String>,
        harm_score: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            receipt_id: receipt_id.into(),
            package_id: package_id.into(),
            proof_summary: proof_summary.into(),
            status,
            disaster_type,
            harm_score,
            timestamp: Utc::now(),
        }
    }
}

/// `POST /api/receipts` body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReceipt {
    pub receipt_id: String,
    pub package_id: String,
    pub proof_summary: String,
    pub status: ReceiptStatus,
    #[serde(default)]
    pub disaster_type: Option<String>,
}

impl CreateReceipt {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_non_empty("receipt_id", &self.receipt_id)?;
        require_non_empty("package_id", &self.package_id)?;
        require_non_empty("proof_summary", &self.proof_summary)
    }
}

/// `GET /api/receipts` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptList {
    pub receipts: Vec<Receipt>,
    pub count: usize,
}

impl From<Vec<Receipt>> for ReceiptList {
    fn from(receipts: Vec<Receipt>) -> Self {
        let count = receipts.len();
        Self { receipts, count }
    }
}
