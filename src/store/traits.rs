//! `Database` trait: single async interface for all persistence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::packages::model::Package;
use crate::receipts::model::Receipt;

/// Package counts per status, for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageCounts {
    pub total: u64,
    pub in_transit: u64,
    pub delivered: u64,
    pub delayed: u64,
}

/// Backend-agnostic database trait covering packages and receipts.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run all pending schema migrations.
    async fn init_schema(&self) -> Result<(), DatabaseError>;

    // ── Packages ────────────────────────────────────────────────────

    /// Insert a new package. Duplicate `package_id` → `Constraint`.
    async fn insert_package(&self, package: &Package) -> Result<(), DatabaseError>;

    /// Get a package by row ID.
    async fn get_package(&self, id: Uuid) -> Result<Option<Package>, DatabaseError>;

    /// Does a package with this caller-facing ID exist?
    async fn package_id_exists(&self, package_id: &str) -> Result<bool, DatabaseError>;

    /// All packages, most recently updated first.
    async fn list_packages(&self) -> Result<Vec<Package>, DatabaseError>;

    /// Write every mutable column of a package in one statement.
    /// Missing row → `NotFound`.
    async fn update_package(&self, package: &Package) -> Result<(), DatabaseError>;

    /// Counts by status.
    async fn count_packages(&self) -> Result<PackageCounts, DatabaseError>;

    // ── Receipts ────────────────────────────────────────────────────

    /// Insert a new receipt. Duplicate `receipt_id` → `Constraint`.
    async fn insert_receipt(&self, receipt: &Receipt) -> Result<(), DatabaseError>;

    /// Does a receipt with this caller-facing ID exist?
    async fn receipt_id_exists(&self, receipt_id: &str) -> Result<bool, DatabaseError>;

    /// All receipts, newest first.
    async fn list_receipts(&self) -> Result<Vec<Receipt>, DatabaseError>;
}
