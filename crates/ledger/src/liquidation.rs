//! Seizure calculation
//!
//! Pure arithmetic for the liquidation settlement: how much collateral a
//! repayment seizes, how it splits between liquidator and flagger, capped
//! at what the position actually holds. The engine applies the result;
//! nothing here touches state.

use rust_decimal::Decimal;
use silo_core::{math, Amount, MathError, ProtocolParams};

/// Outcome of one liquidation settlement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidationOutcome {
    /// Corn pulled from the liquidator and burned
    pub debt_repaid: Amount,
    /// Collateral removed from the target position
    pub collateral_seized: Amount,
    /// Portion of the seizure owed to whoever first flagged the account
    pub flagger_bonus: Amount,
    /// Portion of the seizure owed to the liquidator
    pub liquidator_share: Amount,
}

/// Compute the seizure for repaying `debt_to_repay` against a position
/// holding `available_collateral`, at the cached oracle `price`.
///
/// The flagger bonus is paid only when a flagger exists and the seizure is
/// solvent enough to cover a bonus (seized value exceeds the raw
/// debt-equivalent collateral).
pub fn calculate_seizure(
    debt_to_repay: Amount,
    available_collateral: Amount,
    price: Decimal,
    has_flagger: bool,
    params: &ProtocolParams,
) -> Result<LiquidationOutcome, MathError> {
    let base = math::debt_to_collateral_value(debt_to_repay.value(), price)?;
    let with_bonus = math::apply_percent_markup(base, params.liquidation_bonus_pct)?;

    let seized = Amount::new_unchecked(with_bonus).min(available_collateral);

    let flagger_bonus = if has_flagger && seized.value() > base {
        Amount::new_unchecked(math::percent_of(base, params.flagger_bonus_pct)?)
    } else {
        Amount::ZERO
    };

    let liquidator_share = seized.saturating_sub(&flagger_bonus);

    Ok(LiquidationOutcome {
        debt_repaid: debt_to_repay,
        collateral_seized: seized,
        flagger_bonus,
        liquidator_share,
    })
}
