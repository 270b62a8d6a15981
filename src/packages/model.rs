//! Package data model and request/response bodies.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::engine::{Category, Decision, PackageSignals, PriorityLabel, SenderType, Urgency};
use crate::error::ApiError;

/// Where a package is in its journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    InTransit,
    Delivered,
    Delayed,
}

impl PackageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Delayed => "delayed",
        }
    }
}

impl std::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackageStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_transit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            "delayed" => Ok(Self::Delayed),
            _ => Err(format!("Unknown package status: {}", s)),
        }
    }
}

/// A tracked package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Row ID.
    pub id: Uuid,
    /// Caller-facing unique identifier.
    pub package_id: String,
    pub destination: String,
    pub status: PackageStatus,
    /// Fixed at creation.
    pub urgency: Urgency,
    pub description: Option<String>,
    /// Kilograms.
    pub weight: Option<f64>,
    pub fragile: Option<bool>,
    pub sender_type: Option<SenderType>,
    /// Result of the last claim verification (or an explicit flag).
    pub zk_verified_sender: Option<bool>,
    pub category: Option<Category>,
    pub priority_label: Option<PriorityLabel>,
    pub last_updated: DateTime<Utc>,
}

impl Package {
    /// New package with no derived fields.
    pub fn new(
        package_id: impl Into<String>,
        destination: impl Into<String>,
        status: PackageStatus,
        urgency: Urgency,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            package_id: package_id.into(),
            destination: destination.into(),
            status,
            urgency,
            description: None,
            weight: None,
            fragile: None,
            sender_type: None,
            zk_verified_sender: None,
            category: None,
            priority_label: None,
            last_updated: Utc::now(),
        }
    }

    /// Builder: set the structured signals.
    pub fn with_signals(
        mut self,
        weight: Option<f64>,
        fragile: Option<bool>,
        sender_type: Option<SenderType>,
    ) -> Self {
        self.weight = weight;
        self.fragile = fragile;
        self.sender_type = sender_type;
        self
    }

    /// Builder: set description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Signals as the classifier reads them.
    pub fn signals(&self) -> PackageSignals {
        PackageSignals {
            weight: self.weight,
            fragile: self.fragile,
            sender_type: self.sender_type,
            zk_verified: self.zk_verified_sender,
        }
    }

    /// Overwrite both derived fields at once.
    pub fn apply_decision(&mut self, decision: Decision) {
        self.category = decision.category;
        self.priority_label = decision.priority_label;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

/// `POST /api/packages` body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePackage {
    pub package_id: String,
    pub destination: String,
    pub status: PackageStatus,
    pub urgency: Urgency,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub fragile: Option<bool>,
    #[serde(default)]
    pub sender_type: Option<SenderType>,
}

impl CreatePackage {
    pub fn validate(&self) -> Result<(), ApiError> {
        require_non_empty("package_id", &self.package_id)?;
        require_non_empty("destination", &self.destination)?;
        validate_weight(self.weight)
    }

    pub fn into_package(self) -> Package {
        let mut package = Package::new(self.package_id, self.destination, self.status, self.urgency)
            .with_signals(self.weight, self.fragile, self.sender_type);
        package.description = self.description;
        package
    }
}

/// `PATCH /api/packages/{id}` body.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePackageStatus {
    pub status: PackageStatus,
}

/// `PATCH /api/packages/{id}/category` body.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePackageCategory {
    pub category: Category,
}

/// `PATCH /api/packages/{id}/process` body. Every field is optional;
/// unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ProcessSignals {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub fragile: Option<bool>,
    #[serde(default)]
    pub sender_type: Option<SenderType>,
    /// Used for verification only; never stored, redacted in `Debug`.
    #[serde(default, deserialize_with = "deserialize_claim")]
    pub claimed_product_type: Option<SecretString>,
    #[serde(default)]
    pub zk_verified_sender: Option<bool>,
}

impl ProcessSignals {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_weight(self.weight)
    }

    /// Supplied signals replace the stored ones; absent ones are kept.
    pub fn merge_into(&self, package: &mut Package) {
        if self.weight.is_some() {
            package.weight = self.weight;
        }
        if self.fragile.is_some() {
            package.fragile = self.fragile;
        }
        if self.sender_type.is_some() {
            package.sender_type = self.sender_type;
        }
    }
}

fn deserialize_claim<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

/// `GET /api/packages` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageList {
    pub packages: Vec<Package>,
    pub count: usize,
}

impl From<Vec<Package>> for PackageList {
    fn from(packages: Vec<Package>) -> Self {
        let count = packages.len();
        Self { packages, count }
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn validate_weight(weight: Option<f64>) -> Result<(), ApiError> {
    match weight {
        Some(w) if !w.is_finite() || w < 0.0 => Err(ApiError::Validation(
            "weight must be a non-negative number".into(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_body(package_id: &str, weight: Option<f64>) -> CreatePackage {
        CreatePackage {
            package_id: package_id.into(),
            destination: "City Hospital".into(),
            status: PackageStatus::InTransit,
            urgency: Urgency::Critical,
            description: None,
            weight,
            fragile: None,
            sender_type: None,
        }
    }

    #[test]
    fn new_package_has_no_derived_fields() {
        let p = Package::new("PKG-1", "Camp 4", PackageStatus::InTransit, Urgency::Flexible);
        assert!(p.category.is_none());
        assert!(p.priority_label.is_none());
        assert!(p.zk_verified_sender.is_none());
    }

    #[test]
    fn status_serde_snake_case() {
        let json = serde_json::to_string(&PackageStatus::InTransit).unwrap();
        assert_eq!(json, "\"in_transit\"");
        assert_eq!("delayed".parse::<PackageStatus>().unwrap(), PackageStatus::Delayed);
    }

    #[test]
    fn create_validation() {
        assert!(create_body("PKG-1", Some(2.0)).validate().is_ok());
        assert!(create_body("  ", None).validate().is_err());
        assert!(create_body("PKG-1", Some(-1.0)).validate().is_err());
        assert!(create_body("PKG-1", Some(f64::NAN)).validate().is_err());
    }

    #[test]
    fn process_body_ignores_unknown_fields() {
        let body: ProcessSignals = serde_json::from_str(
            r#"{"weight": 1.5, "unknown_field": "x", "another_extra": 123}"#,
        )
        .unwrap();
        assert_eq!(body.weight, Some(1.5));
        assert!(body.claimed_product_type.is_none());
    }

    #[test]
    fn claim_not_visible_in_debug() {
        let body: ProcessSignals =
            serde_json::from_str(r#"{"claimed_product_type": "antibiotics"}"#).unwrap();
        assert!(body.claimed_product_type.is_some());
        assert!(!format!("{body:?}").contains("antibiotics"));
    }

    #[test]
    fn merge_keeps_unsupplied_signals() {
        let mut p = Package::new("PKG-1", "Camp 4", PackageStatus::InTransit, Urgency::Critical)
            .with_signals(Some(8.0), Some(false), Some(SenderType::Ngo));
        let body = ProcessSignals {
            fragile: Some(true),
            ..Default::default()
        };
        body.merge_into(&mut p);
        assert_eq!(p.weight, Some(8.0));
        assert_eq!(p.fragile, Some(true));
        assert_eq!(p.sender_type, Some(SenderType::Ngo));
    }

    #[test]
    fn apply_decision_sets_both_fields() {
        let mut p = Package::new("PKG-1", "Camp 4", PackageStatus::InTransit, Urgency::Critical);
        p.apply_decision(Decision {
            category: Some(Category::Medicine),
            priority_label: Some(PriorityLabel::High),
        });
        assert_eq!(p.category, Some(Category::Medicine));
        assert_eq!(p.priority_label, Some(PriorityLabel::High));

        p.apply_decision(Decision {
            category: None,
            priority_label: None,
        });
        assert!(p.category.is_none());
        assert!(p.priority_label.is_none());
    }

    #[test]
    fn package_list_counts() {
        let list = PackageList::from(vec![
            Package::new("A", "x", PackageStatus::Delivered, Urgency::Flexible),
            Package::new("B", "y", PackageStatus::Delayed, Urgency::Critical),
        ]);
        assert_eq!(list.count, 2);
    }
}
