//! Trust registry: the approved product types a sender may claim.

use std::collections::HashSet;

/// Product types on the WHO approved list (mock authority).
pub const WHO_APPROVED_PRODUCTS: &[&str] = &[
    "antibiotics",
    "vaccines",
    "first_aid",
    "medical_kit",
    "surgical_supplies",
];

/// Immutable set of approved product types.
///
/// Built once at startup and shared behind an `Arc`; there is no way to
/// mutate it after construction.
#[derive(Debug, Clone)]
pub struct TrustRegistry {
    approved: HashSet<String>,
}

impl TrustRegistry {
    /// Build a registry from arbitrary entries. Entries are trimmed and
    /// lowercased; blank entries are dropped.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let approved = entries
            .into_iter()
            .filter_map(|e| normalize(e.as_ref()))
            .collect();
        Self { approved }
    }

    /// The default WHO registry.
    pub fn who_default() -> Self {
        Self::new(WHO_APPROVED_PRODUCTS)
    }

    /// Membership test on an already-normalized product type.
    pub fn contains(&self, normalized: &str) -> bool {
        self.approved.contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.approved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.approved.is_empty()
    }
}

impl Default for TrustRegistry {
    fn default() -> Self {
        Self::who_default()
    }
}

/// Trim + lowercase; `None` when nothing is left.
pub(crate) fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn who_default_has_five_products() {
        let registry = TrustRegistry::who_default();
        assert_eq!(registry.len(), 5);
        assert!(registry.contains("vaccines"));
        assert!(registry.contains("surgical_supplies"));
    }

    #[test]
    fn entries_are_normalized() {
        let registry = TrustRegistry::new(["  Insulin ", "", "   ", "ORS"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("insulin"));
        assert!(registry.contains("ors"));
    }

    #[test]
    fn empty_registry() {
        let registry = TrustRegistry::new(Vec::<String>::new());
        assert!(registry.is_empty());
        assert!(!registry.contains("antibiotics"));
    }
}
