//! Nullable eligibility registry: an in-memory allow list.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use ubi_external::EligibilityRegistry;
use ubi_types::Address;

/// An eligibility registry backed by a shared set of addresses.
///
/// Clones share the same set, so a test can keep a handle and flip a
/// participant's eligibility while the engine owns another clone.
#[derive(Clone, Default)]
pub struct NullRegistry {
    eligible: Arc<Mutex<HashSet<Address>>>,
}

impl NullRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `address` eligible.
    pub fn grant(&self, address: &Address) {
        self.eligible.lock().unwrap().insert(address.clone());
    }

    /// Mark `address` ineligible.
    pub fn revoke(&self, address: &Address) {
        self.eligible.lock().unwrap().remove(address);
    }
}

impl EligibilityRegistry for NullRegistry {
    fn is_eligible(&self, address: &Address) -> bool {
        self.eligible.lock().unwrap().contains(address)
    }
}
