//! libSQL backend: async `Database` trait implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Connection, Database as LibSqlDatabase, Value, params};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::packages::model::Package;
use crate::receipts::model::Receipt;
use crate::store::migrations;
use crate::store::traits::{Database, PackageCounts};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        Ok(backend)
    }

    /// Get the connection.
    fn conn(&self) -> &Connection {
        &self.conn
    }

    async fn exists(&self, sql: &str, key: &str, op: &str) -> Result<bool, DatabaseError> {
        let mut rows = self
            .conn()
            .query(sql, params![key])
            .await
            .map_err(|e| DatabaseError::Query(format!("{op}: {e}")))?;
        match rows.next().await {
            Ok(Some(_)) => Ok(true),
            Ok(None) => Ok(false),
            Err(e) => Err(DatabaseError::Query(format!("{op}: {e}"))),
        }
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Fixed-width RFC 3339 so text ordering matches time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an RFC 3339 or SQLite datetime string into DateTime<Utc>.
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return ndt.and_utc();
    }
    if let Ok(ndt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return ndt.and_utc();
    }
    DateTime::<Utc>::MIN_UTC
}

/// Convert `Option<&str>` to libsql Value.
fn opt_text(s: Option<&str>) -> Value {
    match s {
        Some(s) => Value::Text(s.to_string()),
        None => Value::Null,
    }
}

fn opt_real(f: Option<f64>) -> Value {
    match f {
        Some(f) => Value::Real(f),
        None => Value::Null,
    }
}

fn opt_flag(b: Option<bool>) -> Value {
    match b {
        Some(b) => Value::Integer(b as i64),
        None => Value::Null,
    }
}

fn value_text(v: Value) -> Option<String> {
    match v {
        Value::Text(s) => Some(s),
        _ => None,
    }
}

fn value_real(v: Value) -> Option<f64> {
    match v {
        Value::Real(f) => Some(f),
        Value::Integer(i) => Some(i as f64),
        _ => None,
    }
}

fn value_flag(v: Value) -> Option<bool> {
    match v {
        Value::Integer(i) => Some(i != 0),
        _ => None,
    }
}

fn col(row: &libsql::Row, idx: i32) -> Result<Value, DatabaseError> {
    row.get_value(idx)
        .map_err(|e| DatabaseError::Query(format!("column {idx}: {e}")))
}

fn required_text(row: &libsql::Row, idx: i32) -> Result<String, DatabaseError> {
    value_text(col(row, idx)?)
        .ok_or_else(|| DatabaseError::Serialization(format!("column {idx} is not text")))
}

fn parse_enum<T: std::str::FromStr<Err = String>>(s: &str) -> Result<T, DatabaseError> {
    s.parse().map_err(DatabaseError::Serialization)
}

fn parse_opt_enum<T: std::str::FromStr<Err = String>>(
    v: Value,
) -> Result<Option<T>, DatabaseError> {
    value_text(v).map(|s| parse_enum(&s)).transpose()
}

fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::Serialization(format!("bad uuid {s}: {e}")))
}

const PACKAGE_COLUMNS: &str = "id, package_id, destination, status, urgency, description, weight, fragile, sender_type, zk_verified_sender, category, priority_label, last_updated";

const RECEIPT_COLUMNS: &str =
    "id, receipt_id, package_id, proof_summary, status, disaster_type, harm_score, timestamp";

/// Map a libsql Row (PACKAGE_COLUMNS order) to a Package.
fn row_to_package(row: &libsql::Row) -> Result<Package, DatabaseError> {
    Ok(Package {
        id: parse_uuid(&required_text(row, 0)?)?,
        package_id: required_text(row, 1)?,
        destination: required_text(row, 2)?,
        status: parse_enum(&required_text(row, 3)?)?,
        urgency: parse_enum(&required_text(row, 4)?)?,
        description: value_text(col(row, 5)?),
        weight: value_real(col(row, 6)?),
        fragile: value_flag(col(row, 7)?),
        sender_type: parse_opt_enum(col(row, 8)?)?,
        zk_verified_sender: value_flag(col(row, 9)?),
        category: parse_opt_enum(col(row, 10)?)?,
        priority_label: parse_opt_enum(col(row, 11)?)?,
        last_updated: parse_datetime(&required_text(row, 12)?),
    })
}

/// Map a libsql Row (RECEIPT_COLUMNS order) to a Receipt.
fn row_to_receipt(row: &libsql::Row) -> Result<Receipt, DatabaseError> {
    let harm_score = match col(row, 6)? {
        Value::Integer(i) => u8::try_from(i.clamp(0, 100)).unwrap_or(u8::MAX),
        other => {
            return Err(DatabaseError::Serialization(format!(
                "harm_score is not an integer: {other:?}"
            )));
        }
    };
    Ok(Receipt {
        id: parse_uuid(&required_text(row, 0)?)?,
        receipt_id: required_text(row, 1)?,
        package_id: required_text(row, 2)?,
        proof_summary: required_text(row, 3)?,
        status: parse_enum(&required_text(row, 4)?)?,
        disaster_type: value_text(col(row, 5)?),
        harm_score,
        timestamp: parse_datetime(&required_text(row, 7)?),
    })
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl Database for LibSqlBackend {
    async fn init_schema(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    // ── Packages ────────────────────────────────────────────────────

    async fn insert_package(&self, package: &Package) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                &format!(
                    "INSERT INTO packages ({PACKAGE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
                ),
                params![
                    package.id.to_string(),
                    package.package_id.clone(),
                    package.destination.clone(),
                    package.status.as_str(),
                    package.urgency.as_str(),
                    opt_text(package.description.as_deref()),
                    opt_real(package.weight),
                    opt_flag(package.fragile),
                    opt_text(package.sender_type.map(|s| s.as_str())),
                    opt_flag(package.zk_verified_sender),
                    opt_text(package.category.map(|c| c.as_str())),
                    opt_text(package.priority_label.map(|p| p.as_str())),
                    format_datetime(&package.last_updated),
                ],
            )
            .await
            .map_err(|e| DatabaseError::from_write("insert_package", e))?;

        debug!(id = %package.id, package_id = %package.package_id, "Package inserted into DB");
        Ok(())
    }

    async fn get_package(&self, id: Uuid) -> Result<Option<Package>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = ?1"),
                params![id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_package: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => Ok(Some(row_to_package(&row)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_package: {e}"))),
        }
    }

    async fn package_id_exists(&self, package_id: &str) -> Result<bool, DatabaseError> {
        self.exists(
            "SELECT 1 FROM packages WHERE package_id = ?1 LIMIT 1",
            package_id,
            "package_id_exists",
        )
        .await
    }

    async fn list_packages(&self) -> Result<Vec<Package>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {PACKAGE_COLUMNS} FROM packages ORDER BY last_updated DESC, rowid DESC"
                ),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_packages: {e}")))?;

        let mut packages = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => packages.push(row_to_package(&row)?),
                Ok(None) => break,
                Err(e) => return Err(DatabaseError::Query(format!("list_packages: {e}"))),
            }
        }
        Ok(packages)
    }

    async fn update_package(&self, package: &Package) -> Result<(), DatabaseError> {
        let affected = self
            .conn()
            .execute(
                "UPDATE packages SET destination = ?1, status = ?2, description = ?3, weight = ?4,
                    fragile = ?5, sender_type = ?6, zk_verified_sender = ?7, category = ?8,
                    priority_label = ?9, last_updated = ?10
                 WHERE id = ?11",
                params![
                    package.destination.clone(),
                    package.status.as_str(),
                    opt_text(package.description.as_deref()),
                    opt_real(package.weight),
                    opt_flag(package.fragile),
                    opt_text(package.sender_type.map(|s| s.as_str())),
                    opt_flag(package.zk_verified_sender),
                    opt_text(package.category.map(|c| c.as_str())),
                    opt_text(package.priority_label.map(|p| p.as_str())),
                    format_datetime(&package.last_updated),
                    package.id.to_string(),
                ],
            )
            .await
            .map_err(|e| DatabaseError::from_write("update_package", e))?;

        if affected == 0 {
            return Err(DatabaseError::NotFound {
                entity: "Package".into(),
                id: package.id.to_string(),
            });
        }
        debug!(id = %package.id, status = %package.status, "Package updated in DB");
        Ok(())
    }

    async fn count_packages(&self) -> Result<PackageCounts, DatabaseError> {
        let mut rows = self
            .conn()
            .query("SELECT status, COUNT(*) FROM packages GROUP BY status", ())
            .await
            .map_err(|e| DatabaseError::Query(format!("count_packages: {e}")))?;

        let mut counts = PackageCounts::default();
        loop {
            let row = match rows.next().await {
                Ok(Some(row)) => row,
                Ok(None) => break,
                Err(e) => return Err(DatabaseError::Query(format!("count_packages: {e}"))),
            };
            let status = required_text(&row, 0)?;
            let n = match col(&row, 1)? {
                Value::Integer(n) => n.max(0) as u64,
                _ => 0,
            };
            counts.total += n;
            match status.as_str() {
                "in_transit" => counts.in_transit += n,
                "delivered" => counts.delivered += n,
                "delayed" => counts.delayed += n,
                other => warn!(status = other, "Unknown package status in DB"),
            }
        }
        Ok(counts)
    }

    // ── Receipts ────────────────────────────────────────────────────

    async fn insert_receipt(&self, receipt: &Receipt) -> Result<(), DatabaseError> {
        self.conn()
            .execute(
                &format!(
                    "INSERT INTO receipts ({RECEIPT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                params![
                    receipt.id.to_string(),
                    receipt.receipt_id.clone(),
                    receipt.package_id.clone(),
                    receipt.proof_summary.clone(),
                    receipt.status.as_str(),
                    opt_text(receipt.disaster_type.as_deref()),
                    receipt.harm_score as i64,
                    format_datetime(&receipt.timestamp),
                ],
            )
            .await
            .map_err(|e| DatabaseError::from_write("insert_receipt", e))?;

        debug!(id = %receipt.id, receipt_id = %receipt.receipt_id, "Receipt inserted into DB");
        Ok(())
    }

    async fn receipt_id_exists(&self, receipt_id: &str) -> Result<bool, DatabaseError> {
        self.exists(
            "SELECT 1 FROM receipts WHERE receipt_id = ?1 LIMIT 1",
            receipt_id,
            "receipt_id_exists",
        )
        .await
    }

    async fn list_receipts(&self) -> Result<Vec<Receipt>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!(
                    "SELECT {RECEIPT_COLUMNS} FROM receipts ORDER BY timestamp DESC, rowid DESC"
                ),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_receipts: {e}")))?;

        let mut receipts = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => receipts.push(row_to_receipt(&row)?),
                Ok(None) => break,
                Err(e) => return Err(DatabaseError::Query(format!("list_receipts: {e}"))),
            }
        }
        Ok(receipts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Category, PriorityLabel, SenderType, Urgency};
    use crate::packages::model::PackageStatus;
    use crate::receipts::model::ReceiptStatus;

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    fn make_package(package_id: &str, status: PackageStatus) -> Package {
        Package::new(package_id, "Relief Camp 3", status, Urgency::Critical)
    }

    // ── Package tests ───────────────────────────────────────────────

    #[tokio::test]
    async fn insert_and_get_package() {
        let db = test_db().await;
        let package = make_package("PKG-1", PackageStatus::InTransit)
            .with_signals(Some(2.5), Some(true), Some(SenderType::Hospital))
            .with_description("insulin pens");
        db.insert_package(&package).await.unwrap();

        let fetched = db.get_package(package.id).await.unwrap().unwrap();
        assert_eq!(fetched.package_id, "PKG-1");
        assert_eq!(fetched.urgency, Urgency::Critical);
        assert_eq!(fetched.weight, Some(2.5));
        assert_eq!(fetched.fragile, Some(true));
        assert_eq!(fetched.sender_type, Some(SenderType::Hospital));
        assert_eq!(fetched.description.as_deref(), Some("insulin pens"));
        assert!(fetched.category.is_none());
        assert!(fetched.priority_label.is_none());
        assert!(fetched.zk_verified_sender.is_none());
    }

    #[tokio::test]
    async fn get_package_not_found() {
        let db = test_db().await;
        assert!(db.get_package(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_package_id_is_constraint() {
        let db = test_db().await;
        db.insert_package(&make_package("PKG-1", PackageStatus::InTransit))
            .await
            .unwrap();
        let err = db
            .insert_package(&make_package("PKG-1", PackageStatus::Delayed))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Constraint(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn package_id_exists() {
        let db = test_db().await;
        db.insert_package(&make_package("PKG-1", PackageStatus::InTransit))
            .await
            .unwrap();
        assert!(db.package_id_exists("PKG-1").await.unwrap());
        assert!(!db.package_id_exists("PKG-2").await.unwrap());
    }

    #[tokio::test]
    async fn update_package_writes_derived_fields_together() {
        let db = test_db().await;
        let mut package = make_package("PKG-1", PackageStatus::InTransit);
        db.insert_package(&package).await.unwrap();

        package.category = Some(Category::Medicine);
        package.priority_label = Some(PriorityLabel::High);
        package.zk_verified_sender = Some(true);
        package.status = PackageStatus::Delivered;
        db.update_package(&package).await.unwrap();

        let fetched = db.get_package(package.id).await.unwrap().unwrap();
        assert_eq!(fetched.category, Some(Category::Medicine));
        assert_eq!(fetched.priority_label, Some(PriorityLabel::High));
        assert_eq!(fetched.zk_verified_sender, Some(true));
        assert_eq!(fetched.status, PackageStatus::Delivered);
    }

    #[tokio::test]
    async fn update_missing_package_is_not_found() {
        let db = test_db().await;
        let package = make_package("PKG-1", PackageStatus::InTransit);
        let err = db.update_package(&package).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_packages_most_recent_first() {
        let db = test_db().await;
        let mut older = make_package("OLD", PackageStatus::InTransit);
        older.last_updated = Utc::now() - chrono::Duration::minutes(5);
        let newer = make_package("NEW", PackageStatus::InTransit);
        db.insert_package(&older).await.unwrap();
        db.insert_package(&newer).await.unwrap();

        let list = db.list_packages().await.unwrap();
        let ids: Vec<_> = list.iter().map(|p| p.package_id.as_str()).collect();
        assert_eq!(ids, vec!["NEW", "OLD"]);
    }

    #[tokio::test]
    async fn unreadable_row_fails_the_list() {
        let db = test_db().await;
        db.insert_package(&make_package("GOOD", PackageStatus::InTransit))
            .await
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO packages (id, package_id, destination, status, urgency, last_updated)
                 VALUES (?1, 'BAD', 'Camp', 'lost_at_sea', 'critical', ?2)",
                params![Uuid::new_v4().to_string(), format_datetime(&Utc::now())],
            )
            .await
            .unwrap();

        let err = db.list_packages().await.unwrap_err();
        assert!(matches!(err, DatabaseError::Serialization(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn count_packages_by_status() {
        let db = test_db().await;
        for (id, status) in [
            ("A", PackageStatus::InTransit),
            ("B", PackageStatus::InTransit),
            ("C", PackageStatus::Delayed),
            ("D", PackageStatus::Delivered),
        ] {
            db.insert_package(&make_package(id, status)).await.unwrap();
        }
        let counts = db.count_packages().await.unwrap();
        assert_eq!(
            counts,
            PackageCounts {
                total: 4,
                in_transit: 2,
                delivered: 1,
                delayed: 1,
            }
        );
    }

    #[tokio::test]
    async fn count_packages_empty() {
        let db = test_db().await;
        assert_eq!(db.count_packages().await.unwrap(), PackageCounts::default());
    }

    // ── Receipt tests ───────────────────────────────────────────────

    #[tokio::test]
    async fn insert_and_list_receipt() {
        let db = test_db().await;
        let receipt = Receipt::new(
            "R-1",
            "PKG-1",
            "Signed by ER director",
            ReceiptStatus::Verified,
            Some("Flood".into()),
            90,
        );
        db.insert_receipt(&receipt).await.unwrap();

        let list = db.list_receipts().await.unwrap();
        assert_eq!(list.len(), 1);
        let fetched = &list[0];
        assert_eq!(fetched.id, receipt.id);
        assert_eq!(fetched.receipt_id, "R-1");
        assert_eq!(fetched.harm_score, 90);
        assert_eq!(fetched.disaster_type.as_deref(), Some("Flood"));
        assert_eq!(fetched.status, ReceiptStatus::Verified);
    }

    #[tokio::test]
    async fn duplicate_receipt_id_is_constraint() {
        let db = test_db().await;
        let r1 = Receipt::new("R-1", "PKG-1", "a", ReceiptStatus::Pending, None, 10);
        let r2 = Receipt::new("R-1", "PKG-2", "b", ReceiptStatus::Pending, None, 10);
        db.insert_receipt(&r1).await.unwrap();
        assert!(matches!(
            db.insert_receipt(&r2).await,
            Err(DatabaseError::Constraint(_))
        ));
        assert!(db.receipt_id_exists("R-1").await.unwrap());
    }

    #[tokio::test]
    async fn list_receipts_newest_first() {
        let db = test_db().await;
        let mut first = Receipt::new("R-1", "PKG-1", "a", ReceiptStatus::Pending, None, 10);
        first.timestamp = Utc::now() - chrono::Duration::hours(1);
        let second = Receipt::new("R-2", "PKG-2", "b", ReceiptStatus::Verified, None, 70);
        db.insert_receipt(&first).await.unwrap();
        db.insert_receipt(&second).await.unwrap();

        let list = db.list_receipts().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].receipt_id, "R-2");
        assert_eq!(list[1].receipt_id, "R-1");
    }

    #[tokio::test]
    async fn local_file_database_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("ledger.db");
        let package = make_package("PKG-1", PackageStatus::InTransit);
        {
            let db = LibSqlBackend::new_local(&path).await.unwrap();
            db.insert_package(&package).await.unwrap();
        }
        assert!(path.exists());
        let db = LibSqlBackend::new_local(&path).await.unwrap();
        assert!(db.package_id_exists("PKG-1").await.unwrap());
    }
}
