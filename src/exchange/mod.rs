//! Routed money movement.
//!
//! [`ExchangeRouter`] classifies each transfer by routing number and runs
//! exactly one handler (internal transfer, external debit, deposit) inside
//! a single ledger transaction. [`HistoryReader`] reconstructs a per-account
//! view of the resulting ledger.

pub mod error;
pub mod history;
pub mod router;
pub mod types;

mod deposit;
mod external;
mod internal;

pub use error::ExchangeError;
pub use history::HistoryReader;
pub use router::ExchangeRouter;
pub use types::{ExchangeData, ExchangeReceipt, ExchangeRequest, ExchangeResponse, HistoryRecord};
