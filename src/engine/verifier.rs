//! Trust verifier: ZK-style check of a sender's product claim.
//!
//! The verifier answers one question: is the claimed product type on the
//! trusted registry? Only the boolean leaves this module. The claim is
//! neither stored nor logged.

use std::sync::Arc;

use super::registry::{TrustRegistry, normalize};

/// Checks claims against a shared, read-only [`TrustRegistry`].
#[derive(Debug, Clone)]
pub struct TrustVerifier {
    registry: Arc<TrustRegistry>,
}

impl TrustVerifier {
    pub fn new(registry: Arc<TrustRegistry>) -> Self {
        Self { registry }
    }

    /// `false` for absent, empty or whitespace-only claims; otherwise
    /// registry membership of the trimmed, lowercased claim.
    pub fn verify(&self, claimed_product_type: Option<&str>) -> bool {
        claimed_product_type
            .and_then(normalize)
            .is_some_and(|claim| self.registry.contains(&claim))
    }
}
