//! Ledger Store
//!
//! Persistence seam for the money-movement core. Every mutating operation
//! runs inside a [`LedgerTx`] unit of work obtained from [`LedgerStore::begin`]:
//! the caller does its reads, row locks and writes against the transaction,
//! then resolves it with exactly one of `commit` / `rollback`. Nothing is
//! visible to other transactions until commit.
//!
//! Two backends ship with the crate:
//! - [`PgLedgerStore`]: PostgreSQL via sqlx, row locks with `SELECT FOR UPDATE`
//! - [`MemoryLedgerStore`]: in-process tables for tests and simulation

pub mod memory;
pub mod postgres;

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{
    Account, AccountId, AccountNumber, AuditEvent, Autopayment, CompletedTransfer, Customer,
    CustomerId, ExchangeRecord, ExternalAccount, ExternalAccountId, NewAccount, NewAuditEvent,
    NewAutopayment, NewCustomer, NewExchange, NewExternalAccount, NewPoolEntry, NewTransfer,
    PendingTransfer, PoolEntry, RoutingNumber, Transfer, TransferId,
};

/// Errors surfaced by a ledger store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unique-key violation on insert (e.g. queueing the same transfer twice).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An update addressed a row that does not exist.
    #[error("row not found: {0}")]
    NotFound(String),

    /// A persisted row failed to decode (unknown discriminant, bad format).
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Factory for ledger units of work.
///
/// Handlers hold an `Arc<dyn LedgerStore>` and open one transaction per
/// operation. Backends decide what a transaction means (a database
/// transaction, an exclusive lock over in-memory tables).
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError>;
}

/// One transactional unit of work over the ledger tables.
///
/// Reads see the transaction's own uncommitted writes. `*_for_update`
/// lookups take an exclusive row lock that is held until the transaction
/// resolves. Dropping a transaction without resolving it discards it.
#[async_trait]
pub trait LedgerTx: Send {
    // --- customers ---

    async fn customer_by_id(&mut self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    async fn insert_customer(&mut self, customer: NewCustomer) -> Result<Customer, StoreError>;

    // --- accounts ---

    async fn account_by_id(&mut self, id: AccountId) -> Result<Option<Account>, StoreError>;

    async fn account_by_number(
        &mut self,
        number: AccountNumber,
    ) -> Result<Option<Account>, StoreError>;

    /// Re-fetch an account with an exclusive row lock. Callers that intend
    /// to move money must lock every account they will debit or credit
    /// before reading the balances they act on.
    async fn account_for_update(&mut self, id: AccountId)
    -> Result<Option<Account>, StoreError>;

    /// Overwrite the balance of a previously locked account.
    async fn update_balance(
        &mut self,
        id: AccountId,
        balance: Decimal,
    ) -> Result<(), StoreError>;

    async fn insert_account(&mut self, account: NewAccount) -> Result<Account, StoreError>;

    // --- external account registrations ---

    async fn external_account_by_id(
        &mut self,
        id: ExternalAccountId,
    ) -> Result<Option<ExternalAccount>, StoreError>;

    /// First registration matching the account number, lowest id wins.
    async fn external_account_by_number(
        &mut self,
        number: AccountNumber,
    ) -> Result<Option<ExternalAccount>, StoreError>;

    async fn insert_external_account(
        &mut self,
        account: NewExternalAccount,
    ) -> Result<ExternalAccount, StoreError>;

    // --- exchange ledger ---

    async fn insert_exchange(
        &mut self,
        exchange: NewExchange,
    ) -> Result<ExchangeRecord, StoreError>;

    /// All ledger rows where `account_no` appears on the local side, i.e.
    /// as sender with the local routing number or as receiver with the
    /// local routing number. Ordered by posting time, then id.
    async fn exchanges_touching(
        &mut self,
        account_no: AccountNumber,
        local_routing: RoutingNumber,
    ) -> Result<Vec<ExchangeRecord>, StoreError>;

    // --- settlement pool ---

    async fn insert_pool_entry(&mut self, entry: NewPoolEntry) -> Result<PoolEntry, StoreError>;

    /// In-flight entries touching a local account, oldest first. This is
    /// the read side of the pool: reconciliation walks it to settle legs.
    async fn pool_entries_for_account(
        &mut self,
        account_id: AccountId,
    ) -> Result<Vec<PoolEntry>, StoreError>;

    // --- queued external transfers ---

    async fn insert_transfer(&mut self, transfer: NewTransfer) -> Result<Transfer, StoreError>;

    async fn transfer_by_id(&mut self, id: TransferId) -> Result<Option<Transfer>, StoreError>;

    async fn insert_pending(&mut self, pending: PendingTransfer) -> Result<(), StoreError>;

    async fn pending_by_transfer(
        &mut self,
        id: TransferId,
    ) -> Result<Option<PendingTransfer>, StoreError>;

    /// Remove a transfer from the pending queue. Returns false if it was
    /// not queued.
    async fn delete_pending(&mut self, id: TransferId) -> Result<bool, StoreError>;

    async fn insert_completed(&mut self, completed: CompletedTransfer) -> Result<(), StoreError>;

    async fn completed_by_transfer(
        &mut self,
        id: TransferId,
    ) -> Result<Option<CompletedTransfer>, StoreError>;

    // --- autopayments ---

    /// Insert an autopayment, assigning both the global id and the
    /// per-owner `autopayment_id` sequence atomically.
    async fn insert_autopayment(
        &mut self,
        autopayment: NewAutopayment,
    ) -> Result<Autopayment, StoreError>;

    async fn autopayment(
        &mut self,
        owner: CustomerId,
        autopayment_id: i64,
    ) -> Result<Option<Autopayment>, StoreError>;

    async fn update_last_payment(
        &mut self,
        owner: CustomerId,
        autopayment_id: i64,
        paid_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    // --- audit events ---

    async fn insert_event(&mut self, event: NewAuditEvent) -> Result<AuditEvent, StoreError>;

    /// Audit trail for one customer, oldest first.
    async fn events_for_customer(
        &mut self,
        customer_id: CustomerId,
    ) -> Result<Vec<AuditEvent>, StoreError>;

    // --- resolution ---

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}
