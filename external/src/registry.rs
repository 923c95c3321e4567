//! The external human-uniqueness/liveness registry.

use ubi_types::Address;

/// Answers whether an address is currently an eligible participant.
///
/// Queried by every participant transition; the answer may change between
/// calls without the engine being told.
pub trait EligibilityRegistry {
    fn is_eligible(&self, address: &Address) -> bool;
}
