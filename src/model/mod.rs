//! Ledger entities and core identifier types.

pub mod account;
pub mod autopayment;
pub mod event;
pub mod exchange;
pub mod ids;
pub mod pool;
pub mod transfer;

pub use account::{Account, Customer, ExternalAccount, NewAccount, NewCustomer, NewExternalAccount};
pub use autopayment::{
    Autopayment, AutopaymentKey, NewAutopayment, PaymentFrequency, PaymentSchedule,
};
pub use event::{AuditEvent, EventInfo, NewAuditEvent, event_kind};
pub use exchange::{ExchangeKind, ExchangeRecord, ExchangeStatus, NewExchange};
pub use ids::{
    AccountId, AccountNumber, CustomerId, EventId, ExchangeId, ExternalAccountId, PoolEntryId,
    RoutingNumber, TransferId,
};
pub use pool::{NewPoolEntry, PoolEntry};
pub use transfer::{
    CompletedTransfer, NewTransfer, PendingTransfer, Transfer, TransferKind, TransferPhase,
};
