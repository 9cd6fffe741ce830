//! Settlement ledger the adjudicator moves value through.
//!
//! The adjudicator never moves value one transfer at a time. Every operation
//! hands the ledger a complete batch, which the ledger must apply entirely or
//! not at all. Together with the per-channel lock this is what makes each
//! operation atomic with respect to value transfer.

use std::collections::HashMap;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::types::{Address, Amount};

/// A single movement of value between two accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}

impl Transfer {
    pub fn new(from: Address, to: Address, amount: Amount) -> Self {
        Self { from, to, amount }
    }
}

/// Errors reported by a [Ledger] when it refuses a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("account {account} holds {available}, needs {needed}")]
    InsufficientBalance {
        account: Address,
        needed: Amount,
        available: Amount,
    },

    #[error("balance of account {0} would overflow")]
    Overflow(Address),
}

/// Value-moving collaborator.
///
/// Implementations must apply every transfer of `batch` in order, or none of
/// them: after an `Err` the ledger must look as if `settle` was never called.
pub trait Ledger {
    fn settle(&self, batch: &[Transfer]) -> Result<(), LedgerError>;
}

/// Builds a settlement batch, dropping zero-amount transfers.
#[derive(Debug, Default, Clone)]
pub struct Batch(Vec<Transfer>);

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, from: Address, to: Address, amount: Amount) -> &mut Self {
        if !amount.is_zero() {
            self.0.push(Transfer::new(from, to, amount));
        }
        self
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ledger holding all account balances in memory.
///
/// Useful for hosts that keep custody themselves and for tests.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    accounts: Mutex<HashMap<Address, Amount>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` to `account` out of thin air.
    pub fn mint(&self, account: Address, amount: Amount) -> Result<(), LedgerError> {
        let mut accounts = self.accounts.lock();
        let balance = accounts.entry(account).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow(account))?;
        Ok(())
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.accounts
            .lock()
            .get(account)
            .copied()
            .unwrap_or_default()
    }
}

impl Ledger for InMemoryLedger {
    fn settle(&self, batch: &[Transfer]) -> Result<(), LedgerError> {
        let mut accounts = self.accounts.lock();

        // Apply to a scratch copy of the touched accounts first, so a failing
        // transfer in the middle of the batch leaves the real map untouched.
        let mut scratch: HashMap<Address, Amount> = HashMap::new();
        for t in batch {
            let from = *scratch
                .entry(t.from)
                .or_insert_with(|| accounts.get(&t.from).copied().unwrap_or_default());
            let remaining = from
                .checked_sub(t.amount)
                .ok_or(LedgerError::InsufficientBalance {
                    account: t.from,
                    needed: t.amount,
                    available: from,
                })?;
            scratch.insert(t.from, remaining);

            let to = *scratch
                .entry(t.to)
                .or_insert_with(|| accounts.get(&t.to).copied().unwrap_or_default());
            let credited = to.checked_add(t.amount).ok_or(LedgerError::Overflow(t.to))?;
            scratch.insert(t.to, credited);
        }

        debug!(transfers = batch.len(), "settled batch");
        accounts.extend(scratch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    #[test]
    fn batch_skips_zero_transfers() {
        let mut batch = Batch::new();
        batch
            .push(addr(1), addr(2), 0.into())
            .push(addr(1), addr(2), 5.into());
        assert_eq!(batch.transfers().len(), 1);
        assert_eq!(batch.transfers()[0].amount, 5.into());
    }

    #[test]
    fn settle_moves_value() {
        let ledger = InMemoryLedger::new();
        ledger.mint(addr(1), 100.into()).unwrap();

        ledger
            .settle(&[Transfer::new(addr(1), addr(2), 40.into())])
            .unwrap();

        assert_eq!(ledger.balance_of(&addr(1)), 60.into());
        assert_eq!(ledger.balance_of(&addr(2)), 40.into());
    }

    #[test]
    fn failing_batch_leaves_no_trace() {
        let ledger = InMemoryLedger::new();
        ledger.mint(addr(1), 100.into()).unwrap();
        ledger.mint(addr(2), 10.into()).unwrap();

        let err = ledger
            .settle(&[
                Transfer::new(addr(1), addr(3), 100.into()),
                Transfer::new(addr(2), addr(3), 20.into()),
            ])
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                account: addr(2),
                needed: 20.into(),
                available: 10.into(),
            }
        );
        assert_eq!(ledger.balance_of(&addr(1)), 100.into());
        assert_eq!(ledger.balance_of(&addr(2)), 10.into());
        assert_eq!(ledger.balance_of(&addr(3)), 0.into());
    }

    #[test]
    fn transfers_within_a_batch_see_earlier_credits() {
        let ledger = InMemoryLedger::new();
        ledger.mint(addr(1), 50.into()).unwrap();

        ledger
            .settle(&[
                Transfer::new(addr(1), addr(2), 50.into()),
                Transfer::new(addr(2), addr(3), 50.into()),
            ])
            .unwrap();

        assert_eq!(ledger.balance_of(&addr(3)), 50.into());
        assert_eq!(ledger.balance_of(&addr(2)), 0.into());
    }
}
