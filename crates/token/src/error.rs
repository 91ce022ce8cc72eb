//! Token errors

use thiserror::Error;

/// Errors raised by the asset collaborators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Mint/burn attempted by anyone other than the configured authority
    #[error("Caller {caller} is not the token authority")]
    NotAuthorized { caller: String },

    #[error("Insufficient balance for {account}: available {available}, required {required}")]
    InsufficientBalance {
        account: String,
        available: String,
        required: String,
    },

    #[error("Insufficient allowance from {owner} to {spender}")]
    InsufficientAllowance { owner: String, spender: String },

    /// The recipient refuses incoming transfers
    #[error("Transfer rejected by recipient {to}")]
    TransferRejected { to: String },
}
