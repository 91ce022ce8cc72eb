//! Corn debt-asset ledger
//!
//! A fungible token with owner-gated issuance: only the account ledger's
//! authority identity may mint or burn. The authority check happens at
//! this boundary on every call, not by construction alone.

use silo_core::Amount;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::TokenError;

/// Interface the account ledger uses to issue and retire corn
pub trait DebtToken: Send + Sync {
    /// Mint `amount` to `to`. Only the authority may call this.
    fn mint(&self, caller: &str, to: &str, amount: Amount) -> Result<(), TokenError>;

    /// Burn `amount` from `from`. Only the authority may call this.
    fn burn(&self, caller: &str, from: &str, amount: Amount) -> Result<(), TokenError>;

    /// Move `amount` out of the caller's own balance.
    fn transfer(&self, from: &str, to: &str, amount: Amount) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance.
    fn transfer_from(
        &self,
        spender: &str,
        from: &str,
        to: &str,
        amount: Amount,
    ) -> Result<(), TokenError>;

    /// Re-establish `spender`'s allowance from `owner` after a rolled-back
    /// pull, so a failed operation leaves the approval intact.
    fn credit_allowance(&self, owner: &str, spender: &str, amount: Amount);

    /// Current balance of `account`
    fn balance_of(&self, account: &str) -> Amount;
}

#[derive(Debug, Default)]
struct CornState {
    balances: HashMap<String, Amount>,
    /// (owner, spender) -> remaining allowance
    allowances: HashMap<(String, String), Amount>,
    total_supply: Amount,
}

impl CornState {
    fn credit(&mut self, account: &str, amount: Amount) {
        let balance = self.balances.entry(account.to_string()).or_default();
        *balance = balance.checked_add(&amount).unwrap_or(*balance);
    }

    fn debit(&mut self, account: &str, amount: Amount) -> Result<(), TokenError> {
        let balance = self.balances.entry(account.to_string()).or_default();
        *balance = balance
            .checked_sub(&amount)
            .ok_or_else(|| TokenError::InsufficientBalance {
                account: account.to_string(),
                available: balance.to_string(),
                required: amount.to_string(),
            })?;
        Ok(())
    }
}

/// In-memory corn token with a single mint/burn authority
pub struct CornToken {
    authority: String,
    state: RwLock<CornState>,
}

impl CornToken {
    /// Create a corn token whose issuance is controlled by `authority`
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            state: RwLock::new(CornState::default()),
        }
    }

    /// Grant `spender` the right to pull up to `amount` from `owner`
    pub fn approve(&self, owner: &str, spender: &str, amount: Amount) {
        let mut state = self.state.write().unwrap();
        state
            .allowances
            .insert((owner.to_string(), spender.to_string()), amount);
    }

    /// Remaining allowance from `owner` to `spender`
    pub fn allowance(&self, owner: &str, spender: &str) -> Amount {
        let state = self.state.read().unwrap();
        state
            .allowances
            .get(&(owner.to_string(), spender.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Total corn in circulation (minted minus burned)
    pub fn total_supply(&self) -> Amount {
        self.state.read().unwrap().total_supply
    }

    fn require_authority(&self, caller: &str) -> Result<(), TokenError> {
        if caller != self.authority {
            return Err(TokenError::NotAuthorized {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }
}

impl DebtToken for CornToken {
    fn mint(&self, caller: &str, to: &str, amount: Amount) -> Result<(), TokenError> {
        self.require_authority(caller)?;
        let mut state = self.state.write().unwrap();
        state.credit(to, amount);
        state.total_supply = state.total_supply.checked_add(&amount).unwrap_or(state.total_supply);
        Ok(())
    }

    fn burn(&self, caller: &str, from: &str, amount: Amount) -> Result<(), TokenError> {
        self.require_authority(caller)?;
        let mut state = self.state.write().unwrap();
        state.debit(from, amount)?;
        state.total_supply = state.total_supply.saturating_sub(&amount);
        Ok(())
    }

    fn transfer(&self, from: &str, to: &str, amount: Amount) -> Result<(), TokenError> {
        let mut state = self.state.write().unwrap();
        state.debit(from, amount)?;
        state.credit(to, amount);
        Ok(())
    }

    fn transfer_from(
        &self,
        spender: &str,
        from: &str,
        to: &str,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let mut state = self.state.write().unwrap();
        let key = (from.to_string(), spender.to_string());
        let allowance = state.allowances.get(&key).copied().unwrap_or_default();
        let remaining =
            allowance
                .checked_sub(&amount)
                .ok_or_else(|| TokenError::InsufficientAllowance {
                    owner: from.to_string(),
                    spender: spender.to_string(),
                })?;
        state.debit(from, amount)?;
        state.credit(to, amount);
        state.allowances.insert(key, remaining);
        Ok(())
    }

    fn credit_allowance(&self, owner: &str, spender: &str, amount: Amount) {
        let mut state = self.state.write().unwrap();
        let key = (owner.to_string(), spender.to_string());
        let current = state.allowances.get(&key).copied().unwrap_or_default();
        state
            .allowances
            .insert(key, current.checked_add(&amount).unwrap_or(current));
    }

    fn balance_of(&self, account: &str) -> Amount {
        let state = self.state.read().unwrap();
        state.balances.get(account).copied().unwrap_or_default()
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
    fn test_mint_requires_authority() {
        let corn = CornToken::new("LEDGER");
        let result = corn.mint("MALLORY", "MALLORY", amount(1000));
        assert!(matches!(result, Err(TokenError::NotAuthorized { .. })));
        assert!(corn.balance_of("MALLORY").is_zero());
    }

    #[test]
    fn test_mint_and_burn_by_authority() {
        let corn = CornToken::new("LEDGER");
        corn.mint("LEDGER", "ALICE", amount(1000)).unwrap();
        assert_eq!(corn.balance_of("ALICE"), amount(1000));
        assert_eq!(corn.total_supply(), amount(1000));

        corn.burn("LEDGER", "ALICE", amount(400)).unwrap();
        assert_eq!(corn.balance_of("ALICE"), amount(600));
        assert_eq!(corn.total_supply(), amount(600));
    }

    #[test]
    fn test_burn_more_than_balance_fails() {
        let corn = CornToken::new("LEDGER");
        corn.mint("LEDGER", "ALICE", amount(100)).unwrap();
        let result = corn.burn("LEDGER", "ALICE", amount(200));
        assert!(matches!(result, Err(TokenError::InsufficientBalance { .. })));
    }

    #[test]
    fn test_transfer_moves_own_balance() {
        let corn = CornToken::new("LEDGER");
        corn.mint("LEDGER", "ALICE", amount(500)).unwrap();
        corn.transfer("ALICE", "BOB", amount(200)).unwrap();
        assert_eq!(corn.balance_of("ALICE"), amount(300));
        assert_eq!(corn.balance_of("BOB"), amount(200));
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let corn = CornToken::new("LEDGER");
        corn.mint("LEDGER", "ALICE", amount(1000)).unwrap();
        corn.approve("ALICE", "LEDGER", amount(300));

        corn.transfer_from("LEDGER", "ALICE", "LEDGER", amount(200))
            .unwrap();
        assert_eq!(corn.balance_of("ALICE"), amount(800));
        assert_eq!(corn.balance_of("LEDGER"), amount(200));
        assert_eq!(corn.allowance("ALICE", "LEDGER"), amount(100));

        // Exceeding the remaining allowance fails
        let result = corn.transfer_from("LEDGER", "ALICE", "LEDGER", amount(200));
        assert!(matches!(result, Err(TokenError::InsufficientAllowance { .. })));
    }

    #[test]
    fn test_credit_allowance_restores_spent_approval() {
        let corn = CornToken::new("LEDGER");
        corn.mint("LEDGER", "ALICE", amount(1000)).unwrap();
        corn.approve("ALICE", "LEDGER", amount(300));
        corn.transfer_from("LEDGER", "ALICE", "LEDGER", amount(300))
            .unwrap();
        assert!(corn.allowance("ALICE", "LEDGER").is_zero());

        corn.credit_allowance("ALICE", "LEDGER", amount(300));
        assert_eq!(corn.allowance("ALICE", "LEDGER"), amount(300));
    }
}
