//! Protocol parameters
//!
//! Fixed at deployment; the ledger never mutates them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Seconds in the Safety Net grace period (24 hours)
pub const GRACE_PERIOD_SECS: i64 = 86_400;

/// Lending parameters for a Silo deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Minimum health factor; positions below this can be flagged at risk
    pub min_health_factor: Decimal,
    /// Safety Net duration in seconds between flagging and liquidation
    pub grace_period_secs: i64,
    /// Percent of raw collateral value counted toward the health factor
    pub liquidation_threshold_pct: Decimal,
    /// Percent markup on seized collateral paid to the liquidator
    pub liquidation_bonus_pct: Decimal,
    /// Percent of debt-equivalent collateral paid to the risk flagger
    pub flagger_bonus_pct: Decimal,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            min_health_factor: Decimal::ONE,
            grace_period_secs: GRACE_PERIOD_SECS,
            liquidation_threshold_pct: Decimal::new(80, 0), // 80%
            liquidation_bonus_pct: Decimal::new(5, 0),      // 5%
            flagger_bonus_pct: Decimal::new(1, 0),          // 1%
        }
    }
}
