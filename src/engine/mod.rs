//! Classification & priority decision engine.
//!
//! Pure, synchronous components composed in a fixed order:
//! 1. `TrustVerifier`: claimed product type → verified flag
//! 2. `CategoryClassifier`: signals → category (or unknown)
//! 3. `resolve_priority`: (urgency, category) → priority label
//!
//! `severity` is independent and only used for receipts.
//!
//! Nothing here touches the database or the network. Callers fetch the
//! package, run the engine, and write both derived fields back together.

pub mod classifier;
pub mod priority;
pub mod registry;
pub mod severity;
pub mod types;
pub mod verifier;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

pub use classifier::{CategoryClassifier, CategoryRule, PackageSignals};
pub use priority::resolve_priority;
pub use registry::TrustRegistry;
pub use severity::{BASELINE_HARM_SCORE, severity};
pub use types::{Category, PriorityLabel, SenderType, Urgency};
pub use verifier::TrustVerifier;

/// Derived fields for one package. `priority_label` is `Some` only when
/// `category` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub category: Option<Category>,
    pub priority_label: Option<PriorityLabel>,
}

/// The engine as the service layer sees it.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    verifier: TrustVerifier,
    classifier: CategoryClassifier,
}

impl DecisionEngine {
    pub fn new(registry: Arc<TrustRegistry>) -> Self {
        Self {
            verifier: TrustVerifier::new(registry),
            classifier: CategoryClassifier::new(),
        }
    }

    /// Effective verification flag: an explicit flag wins; otherwise a
    /// supplied claim is checked against the registry; otherwise unknown.
    pub fn resolve_verification(
        &self,
        explicit: Option<bool>,
        claim: Option<&SecretString>,
    ) -> Option<bool> {
        if explicit.is_some() {
            return explicit;
        }
        claim.map(|c| self.verifier.verify(Some(c.expose_secret())))
    }

    /// Classify, then prioritize.
    pub fn decide(&self, urgency: Urgency, signals: &PackageSignals) -> Decision {
        let category = self.classifier.classify(signals);
        Decision {
            category,
            priority_label: resolve_priority(urgency, category),
        }
    }

    /// Manual category override: priority from the same matrix.
    pub fn decide_with_category(&self, urgency: Urgency, category: Category) -> Decision {
        Decision {
            category: Some(category),
            priority_label: resolve_priority(urgency, Some(category)),
        }
    }

    pub fn harm_score(&self, disaster_type: Option<&str>) -> u8 {
        severity(disaster_type)
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new(Arc::new(TrustRegistry::who_default()))
    }
}
