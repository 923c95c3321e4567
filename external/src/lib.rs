//! Collaborator interfaces for the UBI accrual engine.
//!
//! The engine never owns balances and never decides who is a unique human.
//! Both concerns live behind the traits in this crate:
//! - [`FungibleLedger`]: balance bookkeeping, minting credits, snapshots.
//! - [`EligibilityRegistry`]: the external human-uniqueness/liveness check.

pub mod error;
pub mod ledger;
pub mod registry;

pub use error::LedgerError;
pub use ledger::{FungibleLedger, SnapshotId};
pub use registry::EligibilityRegistry;
