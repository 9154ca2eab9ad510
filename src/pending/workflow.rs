//! External Transfer Workflow
//!
//! Two-phase movement of money to another institution. Phase one
//! (`queue_transfer`) records the intent and parks it in the pending
//! queue; phase two (`process_transfer`, driven by a periodic runner)
//! debits the account, hands the outbound leg to the settlement pool and
//! moves the transfer to the completed log. Each phase is one ledger
//! transaction.
//!
//! Per transfer the phases form a state machine:
//! `REQUESTED → QUEUED → PROCESSING → COMPLETED`, with rejection leaving
//! no trace beyond the returned error.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};

use super::error::WorkflowError;
use crate::auth::AuthClaims;
use crate::config::RoutingConfig;
use crate::model::{
    AccountId, CompletedTransfer, EventInfo, ExchangeKind, ExchangeStatus, ExternalAccountId,
    NewAuditEvent, NewExchange, NewPoolEntry, NewTransfer, PendingTransfer, Transfer, TransferId,
    TransferKind, TransferPhase,
};
use crate::store::{LedgerStore, LedgerTx};

/// Intent to move money from a local account to a registered external one.
#[derive(Debug, Clone)]
pub struct QueueRequest {
    pub from_account: AccountId,
    pub to_account: ExternalAccountId,
    pub amount: Decimal,
}

pub struct ExternalWorkflow {
    store: Arc<dyn LedgerStore>,
    routing: RoutingConfig,
}

impl ExternalWorkflow {
    pub fn new(store: Arc<dyn LedgerStore>, routing: RoutingConfig) -> Self {
        Self { store, routing }
    }

    /// Queue an external transfer for later processing.
    ///
    /// Both accounts must resolve and the requester must own both sides;
    /// only self-owned transfers may be queued. On success an audit event,
    /// the transfer row and its pending-queue entry are written atomically
    /// and the new transfer id is returned.
    pub async fn queue_transfer(
        &self,
        claims: &AuthClaims,
        request: &QueueRequest,
        info: &EventInfo,
    ) -> Result<TransferId, WorkflowError> {
        let now = Utc::now();
        let mut tx = self.store.begin().await?;
        let result = queue_inner(tx.as_mut(), claims, request, info, now).await;
        match result {
            Ok(transfer_id) => {
                tx.commit().await?;
                Ok(transfer_id)
            }
            Err(err) => {
                tx.rollback().await?;
                debug!(code = err.code(), "Queue transfer rejected");
                Err(err)
            }
        }
    }

    /// Settle one queued transfer.
    ///
    /// Re-validates the transfer, both accounts and queue membership, then
    /// atomically debits the internal account, posts the outbound ledger
    /// row plus pool entry, removes the pending entry and appends to the
    /// completed log. `started` on the log entry is the original enqueue
    /// time.
    pub async fn process_transfer(
        &self,
        transfer_id: TransferId,
    ) -> Result<CompletedTransfer, WorkflowError> {
        let now = Utc::now();
        let mut tx = self.store.begin().await?;
        let result = process_inner(tx.as_mut(), &self.routing, transfer_id, now).await;
        match result {
            Ok(completed) => {
                tx.commit().await?;
                Ok(completed)
            }
            Err(err) => {
                tx.rollback().await?;
                debug!(transfer_id, code = err.code(), "Process transfer rejected");
                Err(err)
            }
        }
    }

    /// The queued intent as recorded.
    pub async fn transfer_info(
        &self,
        transfer_id: TransferId,
    ) -> Result<Transfer, WorkflowError> {
        let mut tx = self.store.begin().await?;
        let transfer = tx.transfer_by_id(transfer_id).await?;
        tx.rollback().await?;
        transfer.ok_or(WorkflowError::TransferNotFound(transfer_id))
    }

    /// Current phase of a transfer, derived from queue/log membership.
    pub async fn phase(&self, transfer_id: TransferId) -> Result<TransferPhase, WorkflowError> {
        let mut tx = self.store.begin().await?;
        let transfer = tx.transfer_by_id(transfer_id).await?;
        let pending = tx.pending_by_transfer(transfer_id).await?;
        let completed = tx.completed_by_transfer(transfer_id).await?;
        tx.rollback().await?;

        if transfer.is_none() {
            return Err(WorkflowError::TransferNotFound(transfer_id));
        }
        Ok(if completed.is_some() {
            TransferPhase::Completed
        } else if pending.is_some() {
            TransferPhase::Queued
        } else {
            TransferPhase::Requested
        })
    }
}

async fn queue_inner(
    tx: &mut dyn LedgerTx,
    claims: &AuthClaims,
    request: &QueueRequest,
    info: &EventInfo,
    now: DateTime<Utc>,
) -> Result<TransferId, WorkflowError> {
    let from_account = tx.account_by_id(request.from_account).await?;
    let to_account = tx.external_account_by_id(request.to_account).await?;
    let (from_account, to_account) = match (from_account, to_account) {
        (Some(from), Some(to)) => (from, to),
        // Transfers cannot be scheduled against unregistered accounts.
        _ => return Err(WorkflowError::AccountNotFound),
    };

    // Only self-owned transfers may be queued: the requester must own both
    // the local source and the registered external target.
    if !(claims.user_id == from_account.owner_id && from_account.owner_id == to_account.owner_id)
    {
        return Err(WorkflowError::PermissionDenied);
    }

    let event = tx
        .insert_event(NewAuditEvent::transfer_queued(claims.user_id, info))
        .await?;
    let transfer = tx
        .insert_transfer(NewTransfer {
            from_account: from_account.id,
            to_account: to_account.id,
            kind: TransferKind::External,
            amount: request.amount,
            create_event_id: event.id,
            created_at: now,
        })
        .await?;
    tx.insert_pending(PendingTransfer {
        transfer_id: transfer.id,
        added: now,
    })
    .await?;

    info!(
        transfer_id = transfer.id,
        from_account = from_account.id,
        to_account = to_account.id,
        amount = %request.amount,
        "External transfer queued"
    );
    Ok(transfer.id)
}

async fn process_inner(
    tx: &mut dyn LedgerTx,
    routing: &RoutingConfig,
    transfer_id: TransferId,
    now: DateTime<Utc>,
) -> Result<CompletedTransfer, WorkflowError> {
    let transfer = tx
        .transfer_by_id(transfer_id)
        .await?
        .ok_or(WorkflowError::TransferNotFound(transfer_id))?;

    let external_account = tx.external_account_by_id(transfer.to_account).await?;
    let internal_account = tx.account_by_id(transfer.from_account).await?;
    let (external_account, internal_account) = match (external_account, internal_account) {
        (Some(external), Some(internal)) => (external, internal),
        _ => return Err(WorkflowError::AccountNotFound),
    };

    let pending = tx
        .pending_by_transfer(transfer_id)
        .await?
        .ok_or(WorkflowError::NotQueued(transfer_id))?;

    let internal_account = tx
        .account_for_update(internal_account.id)
        .await?
        .ok_or(WorkflowError::AccountNotFound)?;

    if transfer.amount > internal_account.balance {
        return Err(WorkflowError::InsufficientFunds);
    }

    tx.update_balance(
        internal_account.id,
        internal_account.balance - transfer.amount,
    )
    .await?;

    let exchange = tx
        .insert_exchange(NewExchange {
            from_account_no: internal_account.account_number,
            to_account_no: external_account.account_number,
            from_routing_no: routing.bank_routing_no,
            to_routing_no: external_account.routing_number,
            amount: transfer.amount,
            posted: now,
            finished: None,
            status: ExchangeStatus::Posted,
            kind: ExchangeKind::Transfer,
        })
        .await?;
    tx.insert_pool_entry(NewPoolEntry {
        internal_account_id: internal_account.id,
        external_account_no: external_account.account_number,
        external_routing_no: external_account.routing_number,
        amount: transfer.amount,
        inbound: false,
        debit_transfer: false,
        exchange_id: exchange.id,
    })
    .await?;

    tx.delete_pending(transfer_id).await?;
    let completed = CompletedTransfer {
        transfer_id,
        started: pending.added,
        completed: now,
    };
    tx.insert_completed(completed.clone()).await?;

    info!(
        transfer_id,
        exchange_id = exchange.id,
        amount = %transfer.amount,
        "External transfer settled into pool"
    );
    Ok(completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountNumber, NewAccount, NewCustomer, NewExternalAccount, RoutingNumber};
    use crate::store::MemoryLedgerStore;
    use rust_decimal_macros::dec;

    const LOCAL: RoutingNumber = RoutingNumber(110000);
    const REMOTE: RoutingNumber = RoutingNumber(990000);

    fn routing() -> RoutingConfig {
        RoutingConfig {
            bank_routing_no: LOCAL,
            debit_auth_key: "hunter2".to_string(),
        }
    }

    struct Seeded {
        owner: i64,
        account: AccountId,
        external: ExternalAccountId,
    }

    async fn seed(store: &MemoryLedgerStore, balance: Decimal) -> Seeded {
        let mut tx = store.begin().await.unwrap();
        let customer = tx
            .insert_customer(NewCustomer {
                username: "wf_user".to_string(),
            })
            .await
            .unwrap();
        let account = tx
            .insert_account(NewAccount {
                owner_id: customer.id,
                account_number: AccountNumber(100),
                balance,
            })
            .await
            .unwrap();
        let external = tx
            .insert_external_account(NewExternalAccount {
                owner_id: customer.id,
                account_number: AccountNumber(555),
                routing_number: REMOTE,
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        Seeded {
            owner: customer.id,
            account: account.id,
            external: external.id,
        }
    }

    #[tokio::test]
    async fn test_queue_rejects_unregistered_accounts() {
        let store = MemoryLedgerStore::new();
        let seeded = seed(&store, dec!(50)).await;
        let workflow = ExternalWorkflow::new(Arc::new(store), routing());

        let result = workflow
            .queue_transfer(
                &AuthClaims::user(seeded.owner),
                &QueueRequest {
                    from_account: seeded.account,
                    to_account: 999,
                    amount: dec!(10),
                },
                &EventInfo::at(Utc::now()),
            )
            .await;
        assert!(matches!(result, Err(WorkflowError::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_queue_requires_self_owned_transfer() {
        let store = MemoryLedgerStore::new();
        let seeded = seed(&store, dec!(50)).await;
        let workflow = ExternalWorkflow::new(Arc::new(store.clone()), routing());

        let mut tx = store.begin().await.unwrap();
        let stranger = tx
            .insert_customer(NewCustomer {
                username: "stranger".to_string(),
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let result = workflow
            .queue_transfer(
                &AuthClaims::user(stranger.id),
                &QueueRequest {
                    from_account: seeded.account,
                    to_account: seeded.external,
                    amount: dec!(10),
                },
                &EventInfo::at(Utc::now()),
            )
            .await;
        assert!(matches!(result, Err(WorkflowError::PermissionDenied)));
    }

    #[tokio::test]
    async fn test_process_requires_queued_entry() {
        let store = MemoryLedgerStore::new();
        let seeded = seed(&store, dec!(50)).await;
        let workflow = ExternalWorkflow::new(Arc::new(store), routing());

        let transfer_id = workflow
            .queue_transfer(
                &AuthClaims::user(seeded.owner),
                &QueueRequest {
                    from_account: seeded.account,
                    to_account: seeded.external,
                    amount: dec!(10),
                },
                &EventInfo::at(Utc::now()),
            )
            .await
            .unwrap();

        workflow.process_transfer(transfer_id).await.unwrap();

        // A second run finds no pending entry.
        let result = workflow.process_transfer(transfer_id).await;
        assert!(matches!(result, Err(WorkflowError::NotQueued(_))));

        let result = workflow.process_transfer(transfer_id + 100).await;
        assert!(matches!(result, Err(WorkflowError::TransferNotFound(_))));
    }

    #[tokio::test]
    async fn test_insufficient_funds_leaves_transfer_queued() {
        let store = MemoryLedgerStore::new();
        let seeded = seed(&store, dec!(5)).await;
        let workflow = ExternalWorkflow::new(Arc::new(store.clone()), routing());

        let transfer_id = workflow
            .queue_transfer(
                &AuthClaims::user(seeded.owner),
                &QueueRequest {
                    from_account: seeded.account,
                    to_account: seeded.external,
                    amount: dec!(10),
                },
                &EventInfo::at(Utc::now()),
            )
            .await
            .unwrap();

        let result = workflow.process_transfer(transfer_id).await;
        assert!(matches!(result, Err(WorkflowError::InsufficientFunds)));

        // Still queued, balance untouched.
        assert_eq!(
            workflow.phase(transfer_id).await.unwrap(),
            TransferPhase::Queued
        );
        let mut tx = store.begin().await.unwrap();
        let account = tx.account_by_id(seeded.account).await.unwrap().unwrap();
        assert_eq!(account.balance, dec!(5));
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_phase_progression() {
        let store = MemoryLedgerStore::new();
        let seeded = seed(&store, dec!(50)).await;
        let workflow = ExternalWorkflow::new(Arc::new(store), routing());

        let transfer_id = workflow
            .queue_transfer(
                &AuthClaims::user(seeded.owner),
                &QueueRequest {
                    from_account: seeded.account,
                    to_account: seeded.external,
                    amount: dec!(10),
                },
                &EventInfo::at(Utc::now()),
            )
            .await
            .unwrap();
        assert_eq!(
            workflow.phase(transfer_id).await.unwrap(),
            TransferPhase::Queued
        );

        workflow.process_transfer(transfer_id).await.unwrap();
        assert_eq!(
            workflow.phase(transfer_id).await.unwrap(),
            TransferPhase::Completed
        );

        let info = workflow.transfer_info(transfer_id).await.unwrap();
        assert_eq!(info.amount, dec!(10));
        assert_eq!(info.kind, TransferKind::External);
    }
}
