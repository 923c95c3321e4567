//! Governor authorization.

use crate::error::AccrualError;
use ubi_types::Address;

/// Restricts policy and configuration changes to a single controller
/// address, fixed when the engine is constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GovernanceGate {
    controller: Address,
}

impl GovernanceGate {
    pub fn new(controller: Address) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &Address {
        &self.controller
    }

    /// Fails with [`AccrualError::Unauthorized`] unless `caller` is the controller.
    pub fn ensure_governor(&self, caller: &Address) -> Result<(), AccrualError> {
        if *caller != self.controller {
            tracing::warn!(caller = %caller, "rejected governor-only call");
            return Err(AccrualError::Unauthorized(caller.clone()));
        }
        Ok(())
    }
}
