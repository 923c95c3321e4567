//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! Every collaborator of the accrual engine (clock, ledger, eligibility
//! registry, storage) is abstracted behind a trait. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod ledger;
pub mod registry;
pub mod store;

pub use clock::NullClock;
pub use ledger::NullLedger;
pub use registry::NullRegistry;
pub use store::NullAccrualStore;
