//! Accrual engine errors.

use thiserror::Error;
use ubi_types::{Address, PolicyId, Timestamp};

#[derive(Debug, Error)]
pub enum AccrualError {
    #[error("caller {0} is not authorized for this operation")]
    Unauthorized(Address),

    #[error("policy {0} already exists")]
    PolicyAlreadyExists(PolicyId),

    #[error("invalid policy window: valid_from {valid_from} must precede valid_to {valid_to}")]
    InvalidWindow {
        valid_from: Timestamp,
        valid_to: Timestamp,
    },

    #[error("accrual rate must be non-zero")]
    ZeroRate,

    #[error("policy {0} does not exist")]
    UnknownPolicy(PolicyId),

    #[error("policy {id} already expired at {valid_to}")]
    AlreadyExpired { id: PolicyId, valid_to: Timestamp },

    #[error("{0} is not eligible")]
    NotEligible(Address),

    #[error("{0} is already accruing")]
    AlreadyAccruing(Address),

    #[error("{0} is not accruing")]
    NotAccruing(Address),

    #[error("{0} is still eligible")]
    StillEligible(Address),

    #[error("arithmetic overflow in accrual computation")]
    ArithmeticOverflow,

    #[error("ledger error: {0}")]
    Ledger(#[from] ubi_external::LedgerError),

    #[error("store error: {0}")]
    Store(#[from] ubi_store::StoreError),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<bincode::Error> for AccrualError {
    fn from(e: bincode::Error) -> Self {
        AccrualError::Codec(e.to_string())
    }
}
