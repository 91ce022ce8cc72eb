//! Collateral asset ledger
//!
//! The base asset users deposit. The account ledger holds deposited
//! collateral under its own identity and pays it back out on withdrawal,
//! liquidation, and flagger-bonus settlement. A recipient may refuse an
//! incoming transfer, which the ledger surfaces as a failed payout.

use silo_core::Amount;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::error::TokenError;

/// Interface the account ledger uses to move collateral
pub trait CollateralToken: Send + Sync {
    /// Move `amount` from `from` to `to`
    fn transfer(&self, from: &str, to: &str, amount: Amount) -> Result<(), TokenError>;

    /// Current balance of `account`
    fn balance_of(&self, account: &str) -> Amount;
}

/// In-memory collateral asset for tests and local runs
#[derive(Default)]
pub struct MockCollateral {
    balances: RwLock<HashMap<String, Amount>>,
    /// Accounts that refuse incoming transfers
    rejecting: RwLock<HashSet<String>>,
}

impl MockCollateral {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `account` with `amount` (test setup)
    pub fn fund(&self, account: &str, amount: Amount) {
        let mut balances = self.balances.write().unwrap();
        let balance = balances.entry(account.to_string()).or_default();
        *balance = balance.checked_add(&amount).unwrap_or(*balance);
    }

    /// Make `account` refuse all incoming transfers
    pub fn reject_transfers_to(&self, account: &str) {
        self.rejecting.write().unwrap().insert(account.to_string());
    }

    /// Make `account` accept incoming transfers again
    pub fn accept_transfers_to(&self, account: &str) {
        self.rejecting.write().unwrap().remove(account);
    }
}

impl CollateralToken for MockCollateral {
    fn transfer(&self, from: &str, to: &str, amount: Amount) -> Result<(), TokenError> {
        if self.rejecting.read().unwrap().contains(to) {
            return Err(TokenError::TransferRejected { to: to.to_string() });
        }
        let mut balances = self.balances.write().unwrap();
        let from_balance = balances.entry(from.to_string()).or_default();
        *from_balance = from_balance.checked_sub(&amount).ok_or_else(|| {
            TokenError::InsufficientBalance {
                account: from.to_string(),
                available: from_balance.to_string(),
                required: amount.to_string(),
            }
        })?;
        let to_balance = balances.entry(to.to_string()).or_default();
        *to_balance = to_balance.checked_add(&amount).unwrap_or(*to_balance);
        Ok(())
    }

    fn balance_of(&self, account: &str) -> Amount {
        self.balances
            .read()
            .unwrap()
            .get(account)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn amount(val: i64) -> Amount {
        Amount::new(Decimal::new(val, 0)).unwrap()
    }

    #[test]
    fn test_fund_and_transfer() {
        let asset = MockCollateral::new();
        asset.fund("ALICE", amount(10));
        asset.transfer("ALICE", "VAULT", amount(4)).unwrap();
        assert_eq!(asset.balance_of("ALICE"), amount(6));
        assert_eq!(asset.balance_of("VAULT"), amount(4));
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let asset = MockCollateral::new();
        asset.fund("ALICE", amount(1));
        let result = asset.transfer("ALICE", "VAULT", amount(5));
        assert!(matches!(result, Err(TokenError::InsufficientBalance { .. })));
        assert_eq!(asset.balance_of("ALICE"), amount(1));
    }

    #[test]
    fn test_rejecting_recipient() {
        let asset = MockCollateral::new();
        asset.fund("VAULT", amount(10));
        asset.reject_transfers_to("BOB");

        let result = asset.transfer("VAULT", "BOB", amount(5));
        assert!(matches!(result, Err(TokenError::TransferRejected { .. })));
        assert_eq!(asset.balance_of("VAULT"), amount(10));

        asset.accept_transfers_to("BOB");
        asset.transfer("VAULT", "BOB", amount(5)).unwrap();
        assert_eq!(asset.balance_of("BOB"), amount(5));
    }
}
