//! Silo Core - Domain types
//!
//! This crate contains the fundamental types used across Silo:
//! - `Amount`: Non-negative decimal wrapper for financial amounts
//! - `ProtocolParams`: Deployment-time lending parameters
//! - `math`: Pure fixed-point conversions and the health-factor formula

pub mod amount;
pub mod math;
pub mod params;

pub use amount::Amount;
pub use math::MathError;
pub use params::ProtocolParams;
