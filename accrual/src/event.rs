//! Records emitted on every successful mint.

use serde::{Deserialize, Serialize};
use ubi_types::{Address, PolicyId, Timestamp};

/// A mint performed by the engine.
///
/// For a participant's own claim `accruer == beneficiary`. For a removal
/// report the beneficiary is the reporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRecord {
    pub accruer: Address,
    pub beneficiary: Address,
    pub amount: u128,
    /// Policies settled by this mint, in the order they were processed.
    pub policies: Vec<PolicyId>,
    pub at: Timestamp,
}

impl MintRecord {
    pub fn is_redirected(&self) -> bool {
        self.accruer != self.beneficiary
    }
}
