//! Silo Token collaborators
//!
//! The ledger consumes two external asset ledgers through these traits:
//! the corn debt asset (owner-gated mint/burn plus allowance transfers)
//! and the base collateral asset. In-memory implementations are provided
//! for tests and local runs.

mod collateral;
mod corn;
mod error;

pub use collateral::{CollateralToken, MockCollateral};
pub use corn::{CornToken, DebtToken};
pub use error::TokenError;
