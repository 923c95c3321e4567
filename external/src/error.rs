use thiserror::Error;
use ubi_types::Address;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("insufficient balance on {account}: need {needed}, available {available}")]
    InsufficientBalance {
        account: Address,
        needed: u128,
        available: u128,
    },

    #[error("balance or supply overflow")]
    Overflow,

    #[error("snapshot {0} does not exist")]
    UnknownSnapshot(u64),

    #[error("{0}")]
    Other(String),
}
