//! Silo Price Oracle
//!
//! Provides the single price feed the ledger consumes: units of debt asset
//! per unit of collateral asset, 18-decimal fixed point. The ledger only
//! reads the feed; mutation belongs to the oracle operator (or a test).

mod error;
mod mock;
mod types;

pub use error::OracleError;
pub use mock::MockOracle;
pub use types::PriceOracle;
