//! Ledger errors
//!
//! Every failure is synchronous and rolls back all effects of the failing
//! call. `GracePeriodActive` is the only variant a liquidator is expected
//! to retry on; the remaining time tells it when.

use rust_decimal::Decimal;
use silo_core::MathError;
use silo_oracle::OracleError;
use silo_token::TokenError;
use thiserror::Error;

/// Errors that can occur in account ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Amount must be positive")]
    ZeroAmount,

    #[error("Position would fall below the minimum health factor: {health_factor}")]
    InsufficientCollateral { health_factor: Decimal },

    #[error("Health factor is not below the minimum")]
    HealthFactorOk,

    #[error("Account is not flagged at risk")]
    NotAtRisk,

    #[error("Safety Net still active: {remaining_secs}s remaining")]
    GracePeriodActive { remaining_secs: i64 },

    #[error("Value transfer failed")]
    TransferFailed(#[source] TokenError),

    #[error("Operation unavailable while paused")]
    Paused,

    #[error("Caller {caller} is not the administrator")]
    NotAdmin { caller: String },

    #[error("Reentrant call rejected")]
    Reentrancy,

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Math(#[from] MathError),
}
