//! Autopayment Error Types

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AutopayError {
    #[error("payment validation failed: {0}")]
    ValidationFailure(&'static str),

    #[error("one of the accounts specified does not exist")]
    AccountNotFound,

    #[error("insufficient permission")]
    PermissionDenied,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl AutopayError {
    /// Stable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AutopayError::ValidationFailure(_) => "VALIDATION_FAILURE",
            AutopayError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            AutopayError::PermissionDenied => "PERMISSION_DENIED",
            AutopayError::Store(_) => "STORE_ERROR",
        }
    }
}
