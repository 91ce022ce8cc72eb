//! Per-account position record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use silo_core::Amount;

/// Opaque account identifier
pub type AccountId = String;

/// A single holder's position.
///
/// Created lazily on first deposit, mutated by every operation, never
/// deleted — a fully unwound account persists with zero balances.
///
/// # Invariants
/// - `debt == 0` implies `at_risk_since == None` and `flagged_by == None`
/// - `at_risk_since` is set only while the health factor is observed below
///   the minimum, and cleared only by an explicit recovery check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Collateral held by the ledger for this account
    pub collateral: Amount,
    /// Outstanding corn debt
    pub debt: Amount,
    /// When the health factor was first observed below the minimum in the
    /// current risk episode; None when not flagged
    pub at_risk_since: Option<DateTime<Utc>>,
    /// Who first flagged the account in the current risk episode
    pub flagged_by: Option<AccountId>,
}

impl Account {
    /// Whether the risk clock is running
    pub fn is_flagged(&self) -> bool {
        self.at_risk_since.is_some()
    }

    /// End the current risk episode
    pub fn clear_risk(&mut self) {
        self.at_risk_since = None;
        self.flagged_by = None;
    }
}

/// Read-only risk view returned by the query surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskStatus {
    pub at_risk: bool,
    pub since: Option<DateTime<Utc>>,
    /// Seconds of Safety Net left; zero when liquidatable or not at risk
    pub grace_remaining_secs: i64,
}
