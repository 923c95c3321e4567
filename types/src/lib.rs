//! Fundamental types for the UBI accrual engine.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! participant addresses, timestamps, policy identifiers and the governable
//! rate-policy defaults.

pub mod address;
pub mod error;
pub mod params;
pub mod time;

pub use address::Address;
pub use error::TypesError;
pub use params::AccrualParams;
pub use time::Timestamp;

/// Identifier of a rate policy. Opaque; chosen by the governor.
pub type PolicyId = u64;
