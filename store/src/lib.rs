//! Abstract storage traits for the UBI accrual engine.
//!
//! Every storage backend (in-memory for testing, or whatever the host
//! chain provides) implements these traits. The engine depends only on the
//! traits.

pub mod accrual;
pub mod error;

pub use accrual::AccrualStore;
pub use error::StoreError;
