//! Core oracle types

use rust_decimal::Decimal;

use crate::OracleError;

/// Price Oracle trait - interface for the collateral/debt price feed
///
/// Implementations can be:
/// - MockOracle: for tests, with a programmatically settable price
/// - An adapter over an external feed in production
///
/// The ledger reads the feed at most once per operation and caches the
/// value for the remainder of that operation.
pub trait PriceOracle: Send + Sync {
    /// Current price: units of debt asset per unit of collateral asset.
    ///
    /// Must never return a non-positive price; such a feed state is
    /// surfaced as an error instead.
    fn current_price(&self) -> Result<Decimal, OracleError>;
}
