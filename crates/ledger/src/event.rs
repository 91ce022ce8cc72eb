//! Ledger notifications
//!
//! Every committed mutating operation publishes one event through the
//! sink. Events are published only after the operation has fully
//! committed; a rolled-back call emits nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use silo_core::Amount;
use std::sync::Mutex;

use crate::account::AccountId;

/// Events emitted by the account ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    CollateralDeposited {
        account: AccountId,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    /// Amount is the clamped amount actually paid out
    CollateralWithdrawn {
        account: AccountId,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    CornBorrowed {
        account: AccountId,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    /// Amount is the clamped amount actually burned
    CornRepaid {
        account: AccountId,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    /// The Safety Net clock started for `account`
    RiskFlagged {
        account: AccountId,
        flagged_by: AccountId,
        at: DateTime<Utc>,
    },

    /// The risk episode ended (recovery or debt paid into health)
    RiskCleared {
        account: AccountId,
        at: DateTime<Utc>,
    },

    Liquidated {
        account: AccountId,
        liquidator: AccountId,
        debt_repaid: Amount,
        collateral_seized: Amount,
        flagger_bonus: Amount,
        timestamp: DateTime<Utc>,
    },

    PauseChanged {
        paused: bool,
        at: DateTime<Utc>,
    },
}

/// Destination for ledger events
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &LedgerEvent);
}

/// Default sink: structured log line per event
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: &LedgerEvent) {
        tracing::info!(?event, "ledger event");
    }
}

/// Collecting sink for tests and local inspection
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LedgerEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events published so far, in order
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().unwrap().clone()
    }

    /// The most recent event, if any
    pub fn last(&self) -> Option<LedgerEvent> {
        self.events.lock().unwrap().last().cloned()
    }
}

impl EventSink for MemorySink {
    fn publish(&self, event: &LedgerEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
