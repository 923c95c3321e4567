//! The fungible balance ledger the engine mints into.

use crate::error::LedgerError;
use ubi_types::Address;

/// Identifier returned by [`FungibleLedger::take_snapshot`].
pub type SnapshotId = u64;

/// Balance bookkeeping owned by the host.
///
/// The accrual engine only ever calls [`credit`](FungibleLedger::credit) and
/// [`take_snapshot`](FungibleLedger::take_snapshot). The remaining methods
/// belong to the same ledger and are used by the host and by tests.
pub trait FungibleLedger {
    /// Mint `amount` into `account`, increasing total supply.
    fn credit(&mut self, account: &Address, amount: u128) -> Result<(), LedgerError>;

    /// Burn `amount` from `account`, decreasing total supply.
    fn burn(&mut self, account: &Address, amount: u128) -> Result<(), LedgerError>;

    /// Move `amount` between two accounts.
    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), LedgerError>;

    fn balance_of(&self, account: &Address) -> u128;

    fn total_supply(&self) -> u128;

    /// Record the current balances and return a handle to read them later.
    fn take_snapshot(&mut self) -> Result<SnapshotId, LedgerError>;

    /// Balance of `account` as of snapshot `id`.
    fn balance_of_at(&self, account: &Address, id: SnapshotId) -> Result<u128, LedgerError>;
}
