//! Mock Oracle for testing
//!
//! Stores a single settable price. Useful for unit tests, integration
//! tests, and the price-crash scenarios the liquidation suite relies on.

use rust_decimal::Decimal;
use std::sync::RwLock;

use crate::error::OracleError;
use crate::types::PriceOracle;

/// Mock Price Oracle for testing
pub struct MockOracle {
    /// Current price; None until the first `set_price`
    price: RwLock<Option<Decimal>>,
}

impl MockOracle {
    /// Create an oracle with no published price
    pub fn new() -> Self {
        Self {
            price: RwLock::new(None),
        }
    }

    /// Create an oracle pre-loaded with a price
    pub fn with_price(price: Decimal) -> Self {
        Self {
            price: RwLock::new(Some(price)),
        }
    }

    /// Publish a new price
    pub fn set_price(&self, price: Decimal) {
        let mut guard = self.price.write().unwrap();
        *guard = Some(price);
    }

    /// Scale the current price by `percent` (e.g. 40 keeps 40% of the value)
    pub fn crash_to_percent(&self, percent: Decimal) {
        let mut guard = self.price.write().unwrap();
        if let Some(price) = *guard {
            *guard = Some(price * percent / Decimal::ONE_HUNDRED);
        }
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceOracle for MockOracle {
    fn current_price(&self) -> Result<Decimal, OracleError> {
        let guard = self.price.read().unwrap();
        let price = guard.ok_or(OracleError::Unavailable)?;
        if price <= Decimal::ZERO {
            return Err(OracleError::InvalidPrice { price });
        }
        Ok(price)
    }
}
