//! In-memory ledger store
//!
//! Backs the same transactional contract as the PostgreSQL store with plain
//! hash maps. A transaction takes the store-wide lock for its whole
//! lifetime, so transactions are fully serialized and row locks are
//! trivially exclusive. Rollback restores a snapshot taken at begin.
//!
//! Intended for unit tests and local simulation, not production.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{LedgerStore, LedgerTx, StoreError};
use crate::model::{
    Account, AccountId, AccountNumber, AuditEvent, Autopayment, CompletedTransfer, Customer,
    CustomerId, ExchangeRecord, ExternalAccount, ExternalAccountId, NewAccount, NewAuditEvent,
    NewAutopayment, NewCustomer, NewExchange, NewExternalAccount, NewPoolEntry, NewTransfer,
    PendingTransfer, PoolEntry, RoutingNumber, Transfer, TransferId,
};

#[derive(Debug, Default, Clone)]
struct Tables {
    customers: FxHashMap<CustomerId, Customer>,
    accounts: FxHashMap<AccountId, Account>,
    external_accounts: FxHashMap<ExternalAccountId, ExternalAccount>,
    exchanges: Vec<ExchangeRecord>,
    pool_entries: Vec<PoolEntry>,
    transfers: FxHashMap<TransferId, Transfer>,
    pending: FxHashMap<TransferId, PendingTransfer>,
    completed: FxHashMap<TransferId, CompletedTransfer>,
    autopayments: Vec<Autopayment>,
    events: Vec<AuditEvent>,
    // Sequences live in the snapshot so rollback rewinds them too.
    next_customer_id: i64,
    next_account_id: i64,
    next_external_account_id: i64,
    next_exchange_id: i64,
    next_pool_entry_id: i64,
    next_transfer_id: i64,
    next_autopayment_id: i64,
    next_event_id: i64,
}

impl Tables {
    fn new() -> Self {
        Tables {
            next_customer_id: 1,
            next_account_id: 1,
            next_external_account_id: 1,
            next_exchange_id: 1,
            next_pool_entry_id: 1,
            next_transfer_id: 1,
            next_autopayment_id: 1,
            next_event_id: 1,
            ..Default::default()
        }
    }
}

/// In-memory [`LedgerStore`].
#[derive(Clone)]
pub struct MemoryLedgerStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        MemoryLedgerStore {
            tables: Arc::new(Mutex::new(Tables::new())),
        }
    }
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError> {
        let guard = self.tables.clone().lock_owned().await;
        let snapshot = guard.clone();
        Ok(Box::new(MemoryTx { guard, snapshot }))
    }
}

/// A unit of work holding the store-wide lock.
pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    snapshot: Tables,
}

#[async_trait]
impl LedgerTx for MemoryTx {
    async fn customer_by_id(&mut self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self.guard.customers.get(&id).cloned())
    }

    async fn insert_customer(&mut self, customer: NewCustomer) -> Result<Customer, StoreError> {
        let id = self.guard.next_customer_id;
        self.guard.next_customer_id += 1;
        let customer = Customer {
            id,
            username: customer.username,
        };
        self.guard.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn account_by_id(&mut self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.guard.accounts.get(&id).cloned())
    }

    async fn account_by_number(
        &mut self,
        number: AccountNumber,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .guard
            .accounts
            .values()
            .find(|a| a.account_number == number)
            .cloned())
    }

    async fn account_for_update(
        &mut self,
        id: AccountId,
    ) -> Result<Option<Account>, StoreError> {
        // The transaction already holds the store-wide lock.
        self.account_by_id(id).await
    }

    async fn update_balance(
        &mut self,
        id: AccountId,
        balance: Decimal,
    ) -> Result<(), StoreError> {
        match self.guard.accounts.get_mut(&id) {
            Some(account) => {
                account.balance = balance;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("account {}", id))),
        }
    }

    async fn insert_account(&mut self, account: NewAccount) -> Result<Account, StoreError> {
        let id = self.guard.next_account_id;
        self.guard.next_account_id += 1;
        let account = Account {
            id,
            owner_id: account.owner_id,
            account_number: account.account_number,
            balance: account.balance,
        };
        self.guard.accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn external_account_by_id(
        &mut self,
        id: ExternalAccountId,
    ) -> Result<Option<ExternalAccount>, StoreError> {
        Ok(self.guard.external_accounts.get(&id).cloned())
    }

    async fn external_account_by_number(
        &mut self,
        number: AccountNumber,
    ) -> Result<Option<ExternalAccount>, StoreError> {
        Ok(self
            .guard
            .external_accounts
            .values()
            .filter(|a| a.account_number == number)
            .min_by_key(|a| a.id)
            .cloned())
    }

    async fn insert_external_account(
        &mut self,
        account: NewExternalAccount,
    ) -> Result<ExternalAccount, StoreError> {
        let id = self.guard.next_external_account_id;
        self.guard.next_external_account_id += 1;
        let account = ExternalAccount {
            id,
            owner_id: account.owner_id,
            account_number: account.account_number,
            routing_number: account.routing_number,
        };
        self.guard.external_accounts.insert(id, account.clone());
        Ok(account)
    }

    async fn insert_exchange(
        &mut self,
        exchange: NewExchange,
    ) -> Result<ExchangeRecord, StoreError> {
        let id = self.guard.next_exchange_id;
        self.guard.next_exchange_id += 1;
        let record = ExchangeRecord {
            id,
            from_account_no: exchange.from_account_no,
            to_account_no: exchange.to_account_no,
            from_routing_no: exchange.from_routing_no,
            to_routing_no: exchange.to_routing_no,
            amount: exchange.amount,
            posted: exchange.posted,
            finished: exchange.finished,
            status: exchange.status,
            kind: exchange.kind,
        };
        self.guard.exchanges.push(record.clone());
        Ok(record)
    }

    async fn exchanges_touching(
        &mut self,
        account_no: AccountNumber,
        local_routing: RoutingNumber,
    ) -> Result<Vec<ExchangeRecord>, StoreError> {
        let mut rows: Vec<ExchangeRecord> = self
            .guard
            .exchanges
            .iter()
            .filter(|x| {
                (x.from_account_no == account_no && x.from_routing_no == local_routing)
                    || (x.to_account_no == account_no && x.to_routing_no == local_routing)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|x| (x.posted, x.id));
        Ok(rows)
    }

    async fn insert_pool_entry(&mut self, entry: NewPoolEntry) -> Result<PoolEntry, StoreError> {
        let id = self.guard.next_pool_entry_id;
        self.guard.next_pool_entry_id += 1;
        let entry = PoolEntry {
            id,
            internal_account_id: entry.internal_account_id,
            external_account_no: entry.external_account_no,
            external_routing_no: entry.external_routing_no,
            amount: entry.amount,
            inbound: entry.inbound,
            debit_transfer: entry.debit_transfer,
            exchange_id: entry.exchange_id,
        };
        self.guard.pool_entries.push(entry.clone());
        Ok(entry)
    }

    async fn pool_entries_for_account(
        &mut self,
        account_id: AccountId,
    ) -> Result<Vec<PoolEntry>, StoreError> {
        Ok(self
            .guard
            .pool_entries
            .iter()
            .filter(|entry| entry.internal_account_id == account_id)
            .cloned()
            .collect())
    }

    async fn insert_transfer(&mut self, transfer: NewTransfer) -> Result<Transfer, StoreError> {
        let id = self.guard.next_transfer_id;
        self.guard.next_transfer_id += 1;
        let transfer = Transfer {
            id,
            from_account: transfer.from_account,
            to_account: transfer.to_account,
            kind: transfer.kind,
            amount: transfer.amount,
            create_event_id: transfer.create_event_id,
            created_at: transfer.created_at,
        };
        self.guard.transfers.insert(id, transfer.clone());
        Ok(transfer)
    }

    async fn transfer_by_id(&mut self, id: TransferId) -> Result<Option<Transfer>, StoreError> {
        Ok(self.guard.transfers.get(&id).cloned())
    }

    async fn insert_pending(&mut self, pending: PendingTransfer) -> Result<(), StoreError> {
        if self.guard.pending.contains_key(&pending.transfer_id) {
            return Err(StoreError::Conflict(format!(
                "transfer {} already queued",
                pending.transfer_id
            )));
        }
        self.guard.pending.insert(pending.transfer_id, pending);
        Ok(())
    }

    async fn pending_by_transfer(
        &mut self,
        id: TransferId,
    ) -> Result<Option<PendingTransfer>, StoreError> {
        Ok(self.guard.pending.get(&id).cloned())
    }

    async fn delete_pending(&mut self, id: TransferId) -> Result<bool, StoreError> {
        Ok(self.guard.pending.remove(&id).is_some())
    }

    async fn insert_completed(&mut self, completed: CompletedTransfer) -> Result<(), StoreError> {
        if self.guard.completed.contains_key(&completed.transfer_id) {
            return Err(StoreError::Conflict(format!(
                "transfer {} already completed",
                completed.transfer_id
            )));
        }
        self.guard.completed.insert(completed.transfer_id, completed);
        Ok(())
    }

    async fn completed_by_transfer(
        &mut self,
        id: TransferId,
    ) -> Result<Option<CompletedTransfer>, StoreError> {
        Ok(self.guard.completed.get(&id).cloned())
    }

    async fn insert_autopayment(
        &mut self,
        autopayment: NewAutopayment,
    ) -> Result<Autopayment, StoreError> {
        let id = self.guard.next_autopayment_id;
        self.guard.next_autopayment_id += 1;
        // Per-owner sequence; the store-wide lock makes this race-free.
        let autopayment_id = self
            .guard
            .autopayments
            .iter()
            .filter(|a| a.owner_id == autopayment.owner_id)
            .map(|a| a.autopayment_id + 1)
            .max()
            .unwrap_or(0);
        let autopayment = Autopayment {
            id,
            owner_id: autopayment.owner_id,
            autopayment_id,
            schedule: autopayment.schedule,
            from_account: autopayment.from_account,
            to_account_ref: autopayment.to_account_ref,
            amount: autopayment.amount,
            kind: autopayment.kind,
            last_payment: None,
        };
        self.guard.autopayments.push(autopayment.clone());
        Ok(autopayment)
    }

    async fn autopayment(
        &mut self,
        owner: CustomerId,
        autopayment_id: i64,
    ) -> Result<Option<Autopayment>, StoreError> {
        Ok(self
            .guard
            .autopayments
            .iter()
            .find(|a| a.owner_id == owner && a.autopayment_id == autopayment_id)
            .cloned())
    }

    async fn update_last_payment(
        &mut self,
        owner: CustomerId,
        autopayment_id: i64,
        paid_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        match self
            .guard
            .autopayments
            .iter_mut()
            .find(|a| a.owner_id == owner && a.autopayment_id == autopayment_id)
        {
            Some(autopayment) => {
                autopayment.last_payment = Some(paid_at);
                Ok(())
            }
            None => Err(StoreError::NotFound(format!(
                "autopayment {}/{}",
                owner, autopayment_id
            ))),
        }
    }

    async fn insert_event(&mut self, event: NewAuditEvent) -> Result<AuditEvent, StoreError> {
        let id = self.guard.next_event_id;
        self.guard.next_event_id += 1;
        let event = AuditEvent {
            id,
            customer_id: event.customer_id,
            kind: event.kind,
            ip4: event.ip4,
            ip6: event.ip6,
            created_at: event.created_at,
        };
        self.guard.events.push(event.clone());
        Ok(event)
    }

    async fn events_for_customer(
        &mut self,
        customer_id: CustomerId,
    ) -> Result<Vec<AuditEvent>, StoreError> {
        Ok(self
            .guard
            .events
            .iter()
            .filter(|event| event.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        // Writes were applied in place; releasing the lock publishes them.
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTx { mut guard, snapshot } = *self;
        *guard = snapshot;
        Ok(())
    }
}
