//! Exchange Error Types
//!
//! Every routed transfer failure is a declared outcome from this enum; the
//! display strings are the `msg` values callers see in the response body.

use thiserror::Error;

use crate::store::StoreError;

/// Failure outcomes of routed exchanges and history reads.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Non-positive amount. The verb names the attempted operation in the
    /// caller-facing message ("transfer" or "deposit").
    #[error("you can only {0} non-zero positive sums of money")]
    InvalidAmount(&'static str),

    #[error("one of the accounts specified does not exist")]
    AccountNotFound,

    /// Self-transfer.
    #[error("invalid transfer")]
    InvalidTransfer,

    #[error("insufficient permission")]
    PermissionDenied,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("Neither of these accounts are managed by this bank")]
    Unroutable,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ExchangeError {
    /// Stable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ExchangeError::InvalidAmount(_) => "INVALID_AMOUNT",
            ExchangeError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            ExchangeError::InvalidTransfer => "INVALID_TRANSFER",
            ExchangeError::PermissionDenied => "PERMISSION_DENIED",
            ExchangeError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ExchangeError::Unroutable => "UNROUTABLE_TRANSFER",
            ExchangeError::Store(_) => "STORE_ERROR",
        }
    }
}
