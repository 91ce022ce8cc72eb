//! Account ledger engine
//!
//! All public operations run checks → effects → interactions: the oracle
//! is read at most once per call and the value cached, balance mutations
//! are committed before any external transfer, and a rejected transfer
//! rolls the whole call back to its pre-image.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use silo_core::{math, Amount, MathError, ProtocolParams};
use silo_oracle::PriceOracle;
use silo_token::{CollateralToken, DebtToken};

use crate::account::{Account, AccountId, RiskStatus};
use crate::clock::Clock;
use crate::error::LedgerError;
use crate::event::{EventSink, LedgerEvent};
use crate::guard::ReentrancyGuard;
use crate::liquidation::{calculate_seizure, LiquidationOutcome};
use crate::state::LedgerState;

/// The account ledger & liquidation engine.
///
/// Owns the account map exclusively; collaborators (oracle, corn token,
/// collateral token, clock, event sink) are consumed through traits. The
/// ledger holds deposited collateral under `ledger_id`, which is also the
/// authority credential the corn token verifies on mint/burn.
pub struct AccountLedger {
    ledger_id: AccountId,
    admin: AccountId,
    params: ProtocolParams,
    paused: bool,
    state: LedgerState,
    oracle: Arc<dyn PriceOracle>,
    corn: Arc<dyn DebtToken>,
    collateral: Arc<dyn CollateralToken>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EventSink>,
    guard: ReentrancyGuard,
}

impl AccountLedger {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ledger_id: impl Into<AccountId>,
        admin: impl Into<AccountId>,
        params: ProtocolParams,
        oracle: Arc<dyn PriceOracle>,
        corn: Arc<dyn DebtToken>,
        collateral: Arc<dyn CollateralToken>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            ledger_id: ledger_id.into(),
            admin: admin.into(),
            params,
            paused: false,
            state: LedgerState::new(),
            oracle,
            corn,
            collateral,
            clock,
            sink,
            guard: ReentrancyGuard::new(),
        }
    }

    // === Mutating surface ===

    /// Deposit collateral. The caller supplies `amount` atomically with
    /// the call; a flagged account that deposits back into health has its
    /// risk episode cleared.
    pub fn deposit_collateral(&mut self, caller: &str, amount: Amount) -> Result<(), LedgerError> {
        let _entered = self.guard.enter()?;
        self.require_unpaused()?;
        require_positive(amount)?;

        // Checks against projected balances: overflow surfaces before any
        // value moves, and the recovery decision needs no math afterwards.
        let account = self.state.account(caller);
        let new_collateral = account
            .collateral
            .checked_add(&amount)
            .ok_or(MathError::Overflow)?;
        self.state
            .total_collateral()
            .checked_add(&amount)
            .ok_or(MathError::Overflow)?;
        let will_recover = if !account.is_flagged() {
            false
        } else if account.debt.is_zero() {
            true
        } else {
            let price = self.read_price()?;
            self.position_health(new_collateral, account.debt, price)?
                >= self.params.min_health_factor
        };

        // Effects
        let snapshot = self.state.snapshot(caller);
        self.state.credit_collateral(caller, amount)?;

        // Interaction: the value attachment itself. A failed pull restores
        // the pre-image.
        if let Err(err) = self.collateral.transfer(caller, &self.ledger_id, amount) {
            self.state.restore(caller, snapshot);
            return Err(LedgerError::TransferFailed(err));
        }

        let now = self.clock.now();
        if will_recover {
            self.state.entry(caller).clear_risk();
            info!(account = caller, "risk cleared");
            self.sink.publish(&LedgerEvent::RiskCleared {
                account: caller.to_string(),
                at: now,
            });
        }

        info!(account = caller, %amount, "collateral deposited");
        self.sink.publish(&LedgerEvent::CollateralDeposited {
            account: caller.to_string(),
            amount,
            timestamp: now,
        });
        Ok(())
    }

    /// Withdraw collateral, clamped to the current balance. Returns the
    /// clamped amount actually paid out.
    pub fn withdraw_collateral(
        &mut self,
        caller: &str,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        let _entered = self.guard.enter()?;
        require_positive(amount)?;

        let account = self.state.account(caller);
        let withdrawn = amount.min(account.collateral);

        if !account.debt.is_zero() {
            let price = self.read_price()?;
            let remaining = account.collateral.saturating_sub(&withdrawn);
            let health = self.position_health(remaining, account.debt, price)?;
            if health < self.params.min_health_factor {
                return Err(LedgerError::InsufficientCollateral {
                    health_factor: health,
                });
            }
        }

        let snapshot = self.state.snapshot(caller);
        self.state.debit_collateral(caller, withdrawn);

        if let Err(err) = self.collateral.transfer(&self.ledger_id, caller, withdrawn) {
            self.state.restore(caller, snapshot);
            return Err(LedgerError::TransferFailed(err));
        }

        let now = self.clock.now();
        info!(account = caller, amount = %withdrawn, "collateral withdrawn");
        self.sink.publish(&LedgerEvent::CollateralWithdrawn {
            account: caller.to_string(),
            amount: withdrawn,
            timestamp: now,
        });
        Ok(withdrawn)
    }

    /// Borrow corn against the caller's collateral. Fails if the position
    /// would open below the minimum health factor.
    pub fn borrow_corn(&mut self, caller: &str, amount: Amount) -> Result<(), LedgerError> {
        let _entered = self.guard.enter()?;
        self.require_unpaused()?;
        require_positive(amount)?;

        let account = self.state.account(caller);
        let price = self.read_price()?;
        let new_debt = account
            .debt
            .checked_add(&amount)
            .ok_or(MathError::Overflow)?;
        let health = self.position_health(account.collateral, new_debt, price)?;
        if health < self.params.min_health_factor {
            return Err(LedgerError::InsufficientCollateral {
                health_factor: health,
            });
        }

        self.state.credit_debt(caller, amount)?;

        if let Err(err) = self.corn.mint(&self.ledger_id, caller, amount) {
            self.state.debit_debt(caller, amount);
            return Err(LedgerError::TransferFailed(err));
        }

        let now = self.clock.now();
        info!(account = caller, %amount, %health, "corn borrowed");
        self.sink.publish(&LedgerEvent::CornBorrowed {
            account: caller.to_string(),
            amount,
            timestamp: now,
        });
        Ok(())
    }

    /// Repay corn, clamped to the outstanding debt. The repaid amount is
    /// burned from the caller's corn balance; a position repaid back into
    /// health has its risk episode cleared. Returns the clamped amount.
    pub fn repay_corn(&mut self, caller: &str, amount: Amount) -> Result<Amount, LedgerError> {
        let _entered = self.guard.enter()?;
        require_positive(amount)?;

        let account = self.state.account(caller);
        let repaid = amount.min(account.debt);
        let remaining = account.debt.saturating_sub(&repaid);

        let will_recover = if !account.is_flagged() {
            false
        } else if remaining.is_zero() {
            true
        } else {
            let price = self.read_price()?;
            self.position_health(account.collateral, remaining, price)?
                >= self.params.min_health_factor
        };

        let snapshot = self.state.snapshot(caller);
        self.state.debit_debt(caller, repaid);

        if let Err(err) = self.corn.burn(&self.ledger_id, caller, repaid) {
            self.state.restore(caller, snapshot);
            return Err(LedgerError::TransferFailed(err));
        }

        let now = self.clock.now();
        if will_recover {
            self.state.entry(caller).clear_risk();
            info!(account = caller, "risk cleared");
            self.sink.publish(&LedgerEvent::RiskCleared {
                account: caller.to_string(),
                at: now,
            });
        }

        info!(account = caller, amount = %repaid, "corn repaid");
        self.sink.publish(&LedgerEvent::CornRepaid {
            account: caller.to_string(),
            amount: repaid,
            timestamp: now,
        });
        Ok(repaid)
    }

    /// Flag `target` at risk, starting the Safety Net clock. Permissionless:
    /// anyone may flag, and the first flagger of a risk episode is
    /// recorded for the bonus. Re-flagging an already-flagged account is a
    /// silent no-op.
    pub fn flag_at_risk(&mut self, caller: &str, target: &str) -> Result<(), LedgerError> {
        let _entered = self.guard.enter()?;

        let account = self.state.account(target);
        if account.debt.is_zero() {
            return Err(LedgerError::HealthFactorOk);
        }
        let price = self.read_price()?;
        let health = self.position_health(account.collateral, account.debt, price)?;
        if health >= self.params.min_health_factor {
            return Err(LedgerError::HealthFactorOk);
        }
        if account.is_flagged() {
            return Ok(());
        }

        let now = self.clock.now();
        let entry = self.state.entry(target);
        entry.at_risk_since = Some(now);
        entry.flagged_by = Some(caller.to_string());

        warn!(account = target, flagged_by = caller, %health, "account flagged at risk");
        self.sink.publish(&LedgerEvent::RiskFlagged {
            account: target.to_string(),
            flagged_by: caller.to_string(),
            at: now,
        });
        Ok(())
    }

    /// Liquidate an unhealthy position whose Safety Net has elapsed.
    ///
    /// `debt_to_repay` is clamped to the target's outstanding debt. The
    /// caller must hold that much corn and have approved the ledger to
    /// pull it. Returns how the seizure was settled.
    pub fn liquidate(
        &mut self,
        caller: &str,
        target: &str,
        debt_to_repay: Amount,
    ) -> Result<LiquidationOutcome, LedgerError> {
        let _entered = self.guard.enter()?;
        self.require_unpaused()?;
        require_positive(debt_to_repay)?;

        // Checks, all against one cached price
        let account = self.state.account(target);
        let repay = debt_to_repay.min(account.debt);
        let price = self.read_price()?;
        let health = self.position_health(account.collateral, account.debt, price)?;
        if health >= self.params.min_health_factor {
            return Err(LedgerError::HealthFactorOk);
        }
        let since = account.at_risk_since.ok_or(LedgerError::NotAtRisk)?;
        let now = self.clock.now();
        let elapsed = (now - since).num_seconds();
        if elapsed < self.params.grace_period_secs {
            return Err(LedgerError::GracePeriodActive {
                remaining_secs: self.params.grace_period_secs - elapsed,
            });
        }

        // Seizure calculation
        let outcome = calculate_seizure(
            repay,
            account.collateral,
            price,
            account.flagged_by.is_some(),
            &self.params,
        )?;
        let flagger = account.flagged_by.clone();

        // Whether the position comes out of its risk episode, decided from
        // projected balances so no computation remains after the effects
        let debt_after = account.debt.saturating_sub(&outcome.debt_repaid);
        let collateral_after = account.collateral.saturating_sub(&outcome.collateral_seized);
        let cleared = debt_after.is_zero()
            || self.position_health(collateral_after, debt_after, price)?
                >= self.params.min_health_factor;

        // Effects, committed before any external transfer
        let snapshot = self.state.snapshot(target);
        self.state.debit_debt(target, outcome.debt_repaid);
        self.state.debit_collateral(target, outcome.collateral_seized);
        if cleared {
            self.state.entry(target).clear_risk();
        }

        // Interactions
        // 1. Pull the repaid corn from the liquidator and burn it.
        if let Err(err) =
            self.corn
                .transfer_from(&self.ledger_id, caller, &self.ledger_id, outcome.debt_repaid)
        {
            self.state.restore(target, snapshot);
            return Err(LedgerError::TransferFailed(err));
        }
        if let Err(err) = self
            .corn
            .burn(&self.ledger_id, &self.ledger_id, outcome.debt_repaid)
        {
            // The ledger holds the corn it just pulled, so this cannot
            // fail; unwind anyway rather than trust the collaborator.
            let _ = self
                .corn
                .transfer(&self.ledger_id, caller, outcome.debt_repaid);
            self.corn
                .credit_allowance(caller, &self.ledger_id, outcome.debt_repaid);
            self.state.restore(target, snapshot);
            return Err(LedgerError::TransferFailed(err));
        }

        // 2. Flagger bonus; a rejected payment folds into the liquidator
        //    share instead of failing the liquidation.
        let mut liquidator_payout = outcome.liquidator_share;
        let mut bonus_paid = Amount::ZERO;
        if !outcome.flagger_bonus.is_zero() {
            if let Some(flagger) = &flagger {
                match self
                    .collateral
                    .transfer(&self.ledger_id, flagger, outcome.flagger_bonus)
                {
                    Ok(()) => bonus_paid = outcome.flagger_bonus,
                    Err(err) => {
                        warn!(?err, flagger = %flagger, "flagger bonus rejected, folded into liquidator share");
                        liquidator_payout = liquidator_payout
                            .checked_add(&outcome.flagger_bonus)
                            .unwrap_or(liquidator_payout);
                    }
                }
            }
        }

        // 3. Liquidator payout; rejection rolls the whole operation back:
        //    the caller gets the corn and its approval back, the target is
        //    restored, and any flagger payment is clawed back.
        if let Err(err) = self
            .collateral
            .transfer(&self.ledger_id, caller, liquidator_payout)
        {
            if !bonus_paid.is_zero() {
                if let Some(flagger) = &flagger {
                    if let Err(claw_err) =
                        self.collateral.transfer(flagger, &self.ledger_id, bonus_paid)
                    {
                        // The bonus is already out and cannot come back:
                        // held collateral now runs short of the account
                        // map by exactly that amount.
                        warn!(
                            ?claw_err,
                            flagger = %flagger,
                            bonus = %bonus_paid,
                            "flagger bonus clawback rejected, held collateral short by the bonus"
                        );
                    }
                }
            }
            let _ = self
                .corn
                .mint(&self.ledger_id, caller, outcome.debt_repaid);
            self.corn
                .credit_allowance(caller, &self.ledger_id, outcome.debt_repaid);
            self.state.restore(target, snapshot);
            return Err(LedgerError::TransferFailed(err));
        }

        if cleared {
            info!(account = target, "risk cleared");
            self.sink.publish(&LedgerEvent::RiskCleared {
                account: target.to_string(),
                at: now,
            });
        }
        warn!(
            account = target,
            liquidator = caller,
            debt_repaid = %outcome.debt_repaid,
            collateral_seized = %outcome.collateral_seized,
            "position liquidated"
        );
        self.sink.publish(&LedgerEvent::Liquidated {
            account: target.to_string(),
            liquidator: caller.to_string(),
            debt_repaid: outcome.debt_repaid,
            collateral_seized: outcome.collateral_seized,
            flagger_bonus: bonus_paid,
            timestamp: now,
        });
        Ok(outcome)
    }

    // === Administrative controls ===

    /// Pause or unpause the entry points that move value into risk
    /// (deposit, borrow, liquidate). Withdraw and repay stay callable so
    /// holders can always exit a paused system.
    pub fn set_paused(&mut self, caller: &str, paused: bool) -> Result<(), LedgerError> {
        if caller != self.admin {
            return Err(LedgerError::NotAdmin {
                caller: caller.to_string(),
            });
        }
        self.paused = paused;
        let now = self.clock.now();
        info!(paused, "pause state changed");
        self.sink
            .publish(&LedgerEvent::PauseChanged { paused, at: now });
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // === Query surface ===

    /// Health factor of `id`; the maximum sentinel when debt is zero.
    pub fn health_factor_of(&self, id: &str) -> Result<Decimal, LedgerError> {
        let account = self.state.account(id);
        if account.debt.is_zero() {
            return Ok(math::INFINITE_HEALTH_FACTOR);
        }
        let price = self.read_price()?;
        self.position_health(account.collateral, account.debt, price)
    }

    /// Risk view: flagged or not, since when, and Safety Net seconds left.
    pub fn risk_status(&self, id: &str) -> RiskStatus {
        let account = self.state.account(id);
        match account.at_risk_since {
            None => RiskStatus {
                at_risk: false,
                since: None,
                grace_remaining_secs: 0,
            },
            Some(since) => {
                let elapsed = (self.clock.now() - since).num_seconds();
                RiskStatus {
                    at_risk: true,
                    since: Some(since),
                    grace_remaining_secs: (self.params.grace_period_secs - elapsed).max(0),
                }
            }
        }
    }

    /// Owned copy of the account record; zeroed for unknown ids.
    pub fn account(&self, id: &str) -> Account {
        self.state.account(id)
    }

    /// Value of `id`'s collateral in corn units at the current price.
    pub fn collateral_value_of(&self, id: &str) -> Result<Decimal, LedgerError> {
        let account = self.state.account(id);
        let price = self.read_price()?;
        Ok(math::collateral_to_debt_value(
            account.collateral.value(),
            price,
        )?)
    }

    /// Collateral held across all accounts (reconciliation)
    pub fn total_collateral(&self) -> Amount {
        self.state.total_collateral()
    }

    /// Reference to internal state (tests, reconciliation)
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Identity under which the ledger holds collateral and issues corn
    pub fn ledger_id(&self) -> &str {
        &self.ledger_id
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    // === Internal ===

    fn read_price(&self) -> Result<Decimal, LedgerError> {
        Ok(self.oracle.current_price()?)
    }

    fn position_health(
        &self,
        collateral: Amount,
        debt: Amount,
        price: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let collateral_value = math::collateral_to_debt_value(collateral.value(), price)?;
        Ok(math::health_factor(
            collateral_value,
            debt.value(),
            self.params.liquidation_threshold_pct,
        )?)
    }

    fn require_unpaused(&self) -> Result<(), LedgerError> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }
}

fn require_positive(amount: Amount) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::event::MemorySink;
    use rust_decimal_macros::dec;
    use silo_oracle::MockOracle;
    use silo_token::{CornToken, MockCollateral};

    const SILO: &str = "SILO";
    const ADMIN: &str = "ADMIN";

    struct Harness {
        ledger: AccountLedger,
        oracle: Arc<MockOracle>,
        corn: Arc<CornToken>,
        collateral: Arc<MockCollateral>,
        clock: Arc<ManualClock>,
        sink: Arc<MemorySink>,
    }

    fn harness(price: Decimal) -> Harness {
        let oracle = Arc::new(MockOracle::with_price(price));
        let corn = Arc::new(CornToken::new(SILO));
        let collateral = Arc::new(MockCollateral::new());
        let clock = Arc::new(ManualClock::from_now());
        let sink = Arc::new(MemorySink::new());
        let ledger = AccountLedger::new(
            SILO,
            ADMIN,
            ProtocolParams::default(),
            oracle.clone(),
            corn.clone(),
            collateral.clone(),
            clock.clone(),
            sink.clone(),
        );
        Harness {
            ledger,
            oracle,
            corn,
            collateral,
            clock,
            sink,
        }
    }

    fn amount(value: Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    #[test]
    fn test_deposit_moves_collateral_into_the_ledger() {
        let mut h = harness(dec!(2000));
        h.collateral.fund("ALICE", amount(dec!(10)));

        h.ledger.deposit_collateral("ALICE", amount(dec!(10))).unwrap();

        assert_eq!(h.ledger.account("ALICE").collateral, amount(dec!(10)));
        assert_eq!(h.collateral.balance_of("ALICE"), Amount::ZERO);
        assert_eq!(h.collateral.balance_of(SILO), amount(dec!(10)));
        assert_eq!(h.ledger.total_collateral(), amount(dec!(10)));
    }

    #[test]
    fn test_zero_amounts_rejected_everywhere() {
        let mut h = harness(dec!(2000));
        assert_eq!(
            h.ledger.deposit_collateral("ALICE", Amount::ZERO),
            Err(LedgerError::ZeroAmount)
        );
        assert_eq!(
            h.ledger.withdraw_collateral("ALICE", Amount::ZERO),
            Err(LedgerError::ZeroAmount)
        );
        assert_eq!(
            h.ledger.borrow_corn("ALICE", Amount::ZERO),
            Err(LedgerError::ZeroAmount)
        );
        assert_eq!(
            h.ledger.repay_corn("ALICE", Amount::ZERO),
            Err(LedgerError::ZeroAmount)
        );
        assert_eq!(
            h.ledger.liquidate("BOB", "ALICE", Amount::ZERO),
            Err(LedgerError::ZeroAmount)
        );
    }

    #[test]
    fn test_deposit_without_funds_fails_cleanly() {
        let mut h = harness(dec!(2000));
        let result = h.ledger.deposit_collateral("ALICE", amount(dec!(10)));
        assert!(matches!(result, Err(LedgerError::TransferFailed(_))));
        assert_eq!(h.ledger.account("ALICE"), Account::default());
        assert_eq!(h.ledger.total_collateral(), Amount::ZERO);
        assert!(h.sink.events().is_empty());
    }

    #[test]
    fn test_deposit_overflow_rejected_before_any_transfer() {
        let mut h = harness(dec!(2000));
        let huge = Amount::new_unchecked(Decimal::MAX);
        h.collateral.fund("ALICE", huge);
        h.ledger.deposit_collateral("ALICE", huge).unwrap();

        h.collateral.fund("ALICE", amount(dec!(1)));
        let result = h.ledger.deposit_collateral("ALICE", amount(dec!(1)));
        assert_eq!(result, Err(LedgerError::Math(MathError::Overflow)));
        // The wallet was never debited
        assert_eq!(h.collateral.balance_of("ALICE"), amount(dec!(1)));
        assert_eq!(h.ledger.account("ALICE").collateral, huge);
    }

    #[test]
    fn test_borrow_requires_healthy_position() {
        let mut h = harness(dec!(2000));
        h.collateral.fund("ALICE", amount(dec!(10)));
        h.ledger.deposit_collateral("ALICE", amount(dec!(10))).unwrap();

        // 80% of 20,000 = 16,000 is the borrow ceiling
        let result = h.ledger.borrow_corn("ALICE", amount(dec!(16001)));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientCollateral { .. })
        ));
        assert!(h.ledger.account("ALICE").debt.is_zero());

        h.ledger.borrow_corn("ALICE", amount(dec!(16000))).unwrap();
        assert_eq!(h.ledger.account("ALICE").debt, amount(dec!(16000)));
        assert_eq!(h.corn.balance_of("ALICE"), amount(dec!(16000)));
    }

    #[test]
    fn test_withdraw_clamps_to_balance() {
        let mut h = harness(dec!(2000));
        h.collateral.fund("ALICE", amount(dec!(10)));
        h.ledger.deposit_collateral("ALICE", amount(dec!(10))).unwrap();

        let withdrawn = h
            .ledger
            .withdraw_collateral("ALICE", amount(dec!(999)))
            .unwrap();
        assert_eq!(withdrawn, amount(dec!(10)));
        assert_eq!(h.collateral.balance_of("ALICE"), amount(dec!(10)));
        assert!(matches!(
            h.sink.last(),
            Some(LedgerEvent::CollateralWithdrawn { amount, .. }) if amount == withdrawn
        ));
    }

    #[test]
    fn test_withdraw_blocked_below_minimum_health() {
        let mut h = harness(dec!(2000));
        h.collateral.fund("ALICE", amount(dec!(10)));
        h.ledger.deposit_collateral("ALICE", amount(dec!(10))).unwrap();
        h.ledger.borrow_corn("ALICE", amount(dec!(15000))).unwrap();

        let result = h.ledger.withdraw_collateral("ALICE", amount(dec!(5)));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientCollateral { .. })
        ));
        assert_eq!(h.ledger.account("ALICE").collateral, amount(dec!(10)));
    }

    #[test]
    fn test_withdraw_rolls_back_when_payout_rejected() {
        let mut h = harness(dec!(2000));
        h.collateral.fund("ALICE", amount(dec!(10)));
        h.ledger.deposit_collateral("ALICE", amount(dec!(10))).unwrap();

        h.collateral.reject_transfers_to("ALICE");
        let result = h.ledger.withdraw_collateral("ALICE", amount(dec!(4)));
        assert!(matches!(result, Err(LedgerError::TransferFailed(_))));

        // The balance decrement must not be observable
        assert_eq!(h.ledger.account("ALICE").collateral, amount(dec!(10)));
        assert_eq!(h.ledger.total_collateral(), amount(dec!(10)));
    }

    #[test]
    fn test_repay_clamps_and_burns() {
        let mut h = harness(dec!(2000));
        h.collateral.fund("ALICE", amount(dec!(10)));
        h.ledger.deposit_collateral("ALICE", amount(dec!(10))).unwrap();
        h.ledger.borrow_corn("ALICE", amount(dec!(1000))).unwrap();

        let repaid = h.ledger.repay_corn("ALICE", amount(dec!(5000))).unwrap();
        assert_eq!(repaid, amount(dec!(1000)));
        assert!(h.ledger.account("ALICE").debt.is_zero());
        assert!(h.corn.balance_of("ALICE").is_zero());
        assert!(h.corn.total_supply().is_zero());
    }

    #[test]
    fn test_pause_gates_risk_increasing_entry_points_only() {
        let mut h = harness(dec!(2000));
        h.collateral.fund("ALICE", amount(dec!(10)));
        h.ledger.deposit_collateral("ALICE", amount(dec!(5))).unwrap();
        h.ledger.borrow_corn("ALICE", amount(dec!(100))).unwrap();

        h.ledger.set_paused(ADMIN, true).unwrap();
        assert!(h.ledger.is_paused());

        assert_eq!(
            h.ledger.deposit_collateral("ALICE", amount(dec!(1))),
            Err(LedgerError::Paused)
        );
        assert_eq!(
            h.ledger.borrow_corn("ALICE", amount(dec!(1))),
            Err(LedgerError::Paused)
        );
        assert_eq!(
            h.ledger.liquidate("BOB", "ALICE", amount(dec!(1))),
            Err(LedgerError::Paused)
        );

        // Exits stay open
        h.ledger.repay_corn("ALICE", amount(dec!(100))).unwrap();
        h.ledger.withdraw_collateral("ALICE", amount(dec!(5))).unwrap();

        h.ledger.set_paused(ADMIN, false).unwrap();
        h.ledger.deposit_collateral("ALICE", amount(dec!(1))).unwrap();
    }

    #[test]
    fn test_only_admin_may_pause() {
        let mut h = harness(dec!(2000));
        assert!(matches!(
            h.ledger.set_paused("MALLORY", true),
            Err(LedgerError::NotAdmin { .. })
        ));
        assert!(!h.ledger.is_paused());
    }

    #[test]
    fn test_flag_healthy_account_rejected() {
        let mut h = harness(dec!(2000));
        h.collateral.fund("ALICE", amount(dec!(10)));
        h.ledger.deposit_collateral("ALICE", amount(dec!(10))).unwrap();

        // Zero debt
        assert_eq!(
            h.ledger.flag_at_risk("BOB", "ALICE"),
            Err(LedgerError::HealthFactorOk)
        );

        // Healthy debt
        h.ledger.borrow_corn("ALICE", amount(dec!(1000))).unwrap();
        assert_eq!(
            h.ledger.flag_at_risk("BOB", "ALICE"),
            Err(LedgerError::HealthFactorOk)
        );
    }

    #[test]
    fn test_liquidate_unflagged_position_is_not_at_risk() {
        let mut h = harness(dec!(2000));
        h.collateral.fund("ALICE", amount(dec!(10)));
        h.ledger.deposit_collateral("ALICE", amount(dec!(10))).unwrap();
        h.ledger.borrow_corn("ALICE", amount(dec!(15000))).unwrap();
        h.oracle.set_price(dec!(800));

        let result = h.ledger.liquidate("BOB", "ALICE", amount(dec!(15000)));
        assert_eq!(result, Err(LedgerError::NotAtRisk));
    }

    #[test]
    fn test_oracle_failure_surfaces_before_any_effect() {
        let mut h = harness(dec!(2000));
        h.collateral.fund("ALICE", amount(dec!(10)));
        h.ledger.deposit_collateral("ALICE", amount(dec!(10))).unwrap();
        h.oracle.set_price(dec!(0));

        let result = h.ledger.borrow_corn("ALICE", amount(dec!(100)));
        assert!(matches!(result, Err(LedgerError::Oracle(_))));
        assert!(h.ledger.account("ALICE").debt.is_zero());
    }

    #[test]
    fn test_queries_on_unknown_account() {
        let h = harness(dec!(2000));
        assert_eq!(h.ledger.account("NOBODY"), Account::default());
        assert_eq!(
            h.ledger.health_factor_of("NOBODY").unwrap(),
            math::INFINITE_HEALTH_FACTOR
        );
        let status = h.ledger.risk_status("NOBODY");
        assert!(!status.at_risk);
        assert_eq!(status.grace_remaining_secs, 0);
        assert_eq!(h.ledger.collateral_value_of("NOBODY").unwrap(), dec!(0));
    }

    #[test]
    fn test_risk_status_counts_down() {
        let mut h = harness(dec!(2000));
        h.collateral.fund("ALICE", amount(dec!(10)));
        h.ledger.deposit_collateral("ALICE", amount(dec!(10))).unwrap();
        h.ledger.borrow_corn("ALICE", amount(dec!(15000))).unwrap();
        h.oracle.set_price(dec!(800));
        h.ledger.flag_at_risk("BOB", "ALICE").unwrap();

        let status = h.ledger.risk_status("ALICE");
        assert!(status.at_risk);
        assert_eq!(status.grace_remaining_secs, 86_400);

        h.clock.advance(chrono::Duration::hours(10));
        assert_eq!(h.ledger.risk_status("ALICE").grace_remaining_secs, 50_400);

        h.clock.advance(chrono::Duration::hours(20));
        assert_eq!(h.ledger.risk_status("ALICE").grace_remaining_secs, 0);
    }
}
