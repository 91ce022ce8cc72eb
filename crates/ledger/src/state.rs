//! In-memory ledger state
//!
//! The account map plus the conservation counter: `total_collateral` must
//! always equal the sum of all per-account collateral balances, which in
//! turn equals the collateral the ledger identity holds on the asset
//! ledger. Balance mutations go through the credit/debit methods so the
//! counter can never drift from the map.

use std::collections::HashMap;

use silo_core::{Amount, MathError};

use crate::account::{Account, AccountId};

/// Snapshot of one account plus the conservation counter, used to roll a
/// failed operation back to its pre-image
#[derive(Debug, Clone)]
pub struct Snapshot {
    account: Account,
    total_collateral: Amount,
}

/// Account map owned exclusively by the engine
#[derive(Debug, Default)]
pub struct LedgerState {
    accounts: HashMap<AccountId, Account>,
    total_collateral: Amount,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow an account if it exists
    pub fn get(&self, id: &str) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// Owned copy of an account; zeroed record for unknown ids
    pub fn account(&self, id: &str) -> Account {
        self.accounts.get(id).cloned().unwrap_or_default()
    }

    /// Mutable access, creating the account lazily
    pub fn entry(&mut self, id: &str) -> &mut Account {
        self.accounts.entry(id.to_string()).or_default()
    }

    /// Collateral held across all accounts
    pub fn total_collateral(&self) -> Amount {
        self.total_collateral
    }

    /// Add collateral. Errors on overflow before either balance moves.
    pub fn credit_collateral(&mut self, id: &str, amount: Amount) -> Result<(), MathError> {
        let new_total = self
            .total_collateral
            .checked_add(&amount)
            .ok_or(MathError::Overflow)?;
        let account = self.entry(id);
        account.collateral = account
            .collateral
            .checked_add(&amount)
            .ok_or(MathError::Overflow)?;
        self.total_collateral = new_total;
        Ok(())
    }

    /// Remove collateral. Callers clamp `amount` to the balance first.
    pub fn debit_collateral(&mut self, id: &str, amount: Amount) {
        let account = self.entry(id);
        account.collateral = account.collateral.saturating_sub(&amount);
        self.total_collateral = self.total_collateral.saturating_sub(&amount);
    }

    /// Add debt. Errors on overflow, leaving the account untouched.
    pub fn credit_debt(&mut self, id: &str, amount: Amount) -> Result<(), MathError> {
        let account = self.entry(id);
        account.debt = account.debt.checked_add(&amount).ok_or(MathError::Overflow)?;
        Ok(())
    }

    /// Remove debt. Callers clamp `amount` to the balance first.
    pub fn debit_debt(&mut self, id: &str, amount: Amount) {
        let account = self.entry(id);
        account.debt = account.debt.saturating_sub(&amount);
    }

    /// Capture the pre-image of `id` before a fallible operation
    pub fn snapshot(&self, id: &str) -> Snapshot {
        Snapshot {
            account: self.account(id),
            total_collateral: self.total_collateral,
        }
    }

    /// Restore a pre-image captured by [`snapshot`](Self::snapshot)
    pub fn restore(&mut self, id: &str, snapshot: Snapshot) {
        self.accounts.insert(id.to_string(), snapshot.account);
        self.total_collateral = snapshot.total_collateral;
    }

    /// Recompute the collateral sum from the map (reconciliation checks)
    pub fn sum_collateral(&self) -> Amount {
        self.accounts
            .values()
            .fold(Amount::ZERO, |acc, a| acc.checked_add(&a.collateral).unwrap_or(acc))
    }

    /// Recompute the debt sum from the map (reconciliation checks)
    pub fn sum_debt(&self) -> Amount {
        self.accounts
            .values()
            .fold(Amount::ZERO, |acc, a| acc.checked_add(&a.debt).unwrap_or(acc))
    }
}
