//! Category classifier: ordered decision list over package signals.
//!
//! Rules are evaluated top to bottom and the first match wins. Order is
//! part of the contract: a verified hospital shipment is medicine because
//! of rule 1, even when rule 2 would also match.
//!
//! 1. verified claim from hospital/ngo/govt → medicine
//! 2. fragile and lighter than 5 kg → medicine
//! 3. luxury sender → fancy
//! 4. retail or warehouse sender → clothes
//!
//! Anything else is unknown (`None`), which is a valid outcome.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{Category, SenderType};

/// Weight (kg) below which a fragile package counts as medical.
pub const FRAGILE_MEDICINE_MAX_WEIGHT_KG: f64 = 5.0;

/// Structured signals the classifier reads. Absent fields never satisfy a
/// rule's predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageSignals {
    pub weight: Option<f64>,
    pub fragile: Option<bool>,
    pub sender_type: Option<SenderType>,
    pub zk_verified: Option<bool>,
}

/// A single classification rule.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    /// Short name used in debug logs.
    pub name: &'static str,
    /// Does this rule fire for the given signals?
    pub matches: fn(&PackageSignals) -> bool,
    /// Category assigned when it fires.
    pub category: Category,
}

fn verified_institution(s: &PackageSignals) -> bool {
    s.zk_verified == Some(true) && s.sender_type.is_some_and(SenderType::is_institutional)
}

fn light_fragile(s: &PackageSignals) -> bool {
    s.fragile == Some(true) && s.weight.is_some_and(|w| w < FRAGILE_MEDICINE_MAX_WEIGHT_KG)
}

fn luxury_sender(s: &PackageSignals) -> bool {
    matches!(s.sender_type, Some(SenderType::Luxury))
}

fn bulk_goods_sender(s: &PackageSignals) -> bool {
    matches!(
        s.sender_type,
        Some(SenderType::Retail | SenderType::Warehouse)
    )
}

/// The rule list, in evaluation order.
pub const DEFAULT_RULES: &[CategoryRule] = &[
    CategoryRule {
        name: "verified_institution",
        matches: verified_institution,
        category: Category::Medicine,
    },
    CategoryRule {
        name: "light_fragile",
        matches: light_fragile,
        category: Category::Medicine,
    },
    CategoryRule {
        name: "luxury_sender",
        matches: luxury_sender,
        category: Category::Fancy,
    },
    CategoryRule {
        name: "bulk_goods_sender",
        matches: bulk_goods_sender,
        category: Category::Clothes,
    },
];

/// Evaluates an ordered list of [`CategoryRule`]s.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    rules: &'static [CategoryRule],
}

impl CategoryClassifier {
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES,
        }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        self.rules
    }

    /// First matching rule wins; `None` when nothing matches.
    pub fn classify(&self, signals: &PackageSignals) -> Option<Category> {
        let rule = self.rules.iter().find(|rule| (rule.matches)(signals));
        match rule {
            Some(rule) => {
                debug!(rule = rule.name, category = %rule.category, "Category rule matched");
                Some(rule.category)
            }
            None => {
                debug!("No category rule matched");
                None
            }
        }
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::new()
    }
}
