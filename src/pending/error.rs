//! Workflow Error Types
//!
//! The queue/process pair never fails silently: every precondition miss is
//! one of these declared outcomes.

use thiserror::Error;

use crate::model::TransferId;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("one of the accounts specified does not exist")]
    AccountNotFound,

    #[error("insufficient permission")]
    PermissionDenied,

    #[error("transfer not found: {0}")]
    TransferNotFound(TransferId),

    /// The transfer exists but is no longer (or was never) queued.
    #[error("transfer {0} is not queued")]
    NotQueued(TransferId),

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl WorkflowError {
    /// Stable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            WorkflowError::PermissionDenied => "PERMISSION_DENIED",
            WorkflowError::TransferNotFound(_) => "TRANSFER_NOT_FOUND",
            WorkflowError::NotQueued(_) => "NOT_QUEUED",
            WorkflowError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            WorkflowError::Store(_) => "STORE_ERROR",
        }
    }
}
