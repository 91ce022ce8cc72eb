//! Silo Account Ledger & Liquidation Engine
//!
//! Owns per-account collateral and corn debt balances, the risk-flagging
//! protocol with its 24-hour Safety Net, and the liquidation settlement
//! algorithm. Every public operation is a single atomic unit of work:
//! checks first, then balance effects, then external transfers, with a
//! full rollback whenever an external transfer is rejected.

pub mod account;
pub mod clock;
pub mod engine;
pub mod error;
pub mod event;
pub mod guard;
pub mod liquidation;
pub mod state;

pub use account::{Account, AccountId, RiskStatus};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::AccountLedger;
pub use error::LedgerError;
pub use event::{EventSink, LedgerEvent, MemorySink, TracingSink};
pub use liquidation::LiquidationOutcome;
pub use state::LedgerState;
