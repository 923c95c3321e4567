//! Nullable fungible ledger: in-memory balances and snapshots.

use std::collections::HashMap;
use ubi_external::{FungibleLedger, LedgerError, SnapshotId};
use ubi_types::Address;

/// An in-memory fungible ledger for testing.
///
/// Snapshots copy the whole balance table. Credits can be made to fail on
/// demand to exercise the caller's rollback behaviour.
#[derive(Default)]
pub struct NullLedger {
    balances: HashMap<Address, u128>,
    total_supply: u128,
    snapshots: Vec<HashMap<Address, u128>>,
    fail_credits: bool,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent credit fail (or succeed again).
    pub fn set_fail_credits(&mut self, fail: bool) {
        self.fail_credits = fail;
    }

    fn debit(&mut self, account: &Address, amount: u128) -> Result<(), LedgerError> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: account.clone(),
                needed: amount,
                available,
            });
        }
        self.balances.insert(account.clone(), available - amount);
        Ok(())
    }
}

impl FungibleLedger for NullLedger {
    fn credit(&mut self, account: &Address, amount: u128) -> Result<(), LedgerError> {
        if self.fail_credits {
            return Err(LedgerError::Other("credit refused".to_string()));
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.total_supply = supply;
        self.balances.insert(account.clone(), balance);
        Ok(())
    }

    fn burn(&mut self, account: &Address, amount: u128) -> Result<(), LedgerError> {
        self.debit(account, amount)?;
        self.total_supply -= amount;
        Ok(())
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), LedgerError> {
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.debit(from, amount)?;
        let to_balance = if from == to { to_balance - amount } else { to_balance };
        self.balances.insert(to.clone(), to_balance);
        Ok(())
    }

    fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn take_snapshot(&mut self) -> Result<SnapshotId, LedgerError> {
        self.snapshots.push(self.balances.clone());
        Ok(self.snapshots.len() as SnapshotId)
    }

    fn balance_of_at(&self, account: &Address, id: SnapshotId) -> Result<u128, LedgerError> {
        let index = usize::try_from(id)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .ok_or(LedgerError::UnknownSnapshot(id))?;
        let snapshot = self
            .snapshots
            .get(index)
            .ok_or(LedgerError::UnknownSnapshot(id))?;
        Ok(snapshot.get(account).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(format!("ubi_{s}"))
    }

    #[test]
    fn credit_burn_transfer() {
        let mut l = NullLedger::new();
        l.credit(&addr("a"), 100).unwrap();
        l.transfer(&addr("a"), &addr("b"), 30).unwrap();
        l.burn(&addr("b"), 10).unwrap();
        assert_eq!(l.balance_of(&addr("a")), 70);
        assert_eq!(l.balance_of(&addr("b")), 20);
        assert_eq!(l.total_supply(), 90);
    }

    #[test]
    fn self_transfer_keeps_balance() {
        let mut l = NullLedger::new();
        l.credit(&addr("a"), 50).unwrap();
        l.transfer(&addr("a"), &addr("a"), 20).unwrap();
        assert_eq!(l.balance_of(&addr("a")), 50);
    }

    #[test]
    fn overdraw_rejected() {
        let mut l = NullLedger::new();
        l.credit(&addr("a"), 5).unwrap();
        assert!(matches!(
            l.burn(&addr("a"), 6),
            Err(LedgerError::InsufficientBalance { needed: 6, available: 5, .. })
        ));
    }

    #[test]
    fn snapshots_freeze_balances() {
        let mut l = NullLedger::new();
        l.credit(&addr("a"), 5).unwrap();
        let id = l.take_snapshot().unwrap();
        l.credit(&addr("a"), 5).unwrap();
        assert_eq!(l.balance_of_at(&addr("a"), id).unwrap(), 5);
        assert_eq!(l.balance_of(&addr("a")), 10);
        assert!(l.balance_of_at(&addr("a"), 0).is_err());
        assert!(l.balance_of_at(&addr("a"), 2).is_err());
    }

    #[test]
    fn failing_credit_changes_nothing() {
        let mut l = NullLedger::new();
        l.set_fail_credits(true);
        assert!(l.credit(&addr("a"), 5).is_err());
        assert_eq!(l.total_supply(), 0);
    }
}
