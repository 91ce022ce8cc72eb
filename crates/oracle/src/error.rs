//! Oracle error types

use rust_decimal::Decimal;
use thiserror::Error;

/// Oracle-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The feed holds a price no computation may consume
    #[error("Invalid oracle price: {price}")]
    InvalidPrice { price: Decimal },

    /// No price has been published yet
    #[error("Oracle price unavailable")]
    Unavailable,
}
