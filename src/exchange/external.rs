//! External-debit handler: outbound leg to another institution.

use chrono::{DateTime, Utc};
use tracing::info;

use super::error::ExchangeError;
use super::types::{ExchangeReceipt, ExchangeRequest};
use crate::auth::AuthClaims;
use crate::config::RoutingConfig;
use crate::model::{ExchangeKind, ExchangeStatus, NewExchange, NewPoolEntry};
use crate::store::LedgerTx;

/// Debit a local account for an outbound inter-bank transfer.
///
/// The ledger row is POSTED, not FINISHED: settlement with the receiving
/// institution happens asynchronously, tracked by the pool entry written
/// here. The external side is not validated against local storage.
pub(super) async fn external_debit(
    tx: &mut dyn LedgerTx,
    routing: &RoutingConfig,
    claims: &AuthClaims,
    request: &ExchangeRequest,
    now: DateTime<Utc>,
) -> Result<ExchangeReceipt, ExchangeError> {
    if request.amount <= rust_decimal::Decimal::ZERO {
        return Err(ExchangeError::InvalidAmount("transfer"));
    }

    let from_account = tx
        .account_by_number(request.from_account_no)
        .await?
        .ok_or(ExchangeError::AccountNotFound)?;

    if from_account.owner_id != claims.user_id {
        return Err(ExchangeError::PermissionDenied);
    }

    let from_account = tx
        .account_for_update(from_account.id)
        .await?
        .ok_or(ExchangeError::AccountNotFound)?;

    if request.amount > from_account.balance {
        return Err(ExchangeError::InsufficientFunds);
    }

    tx.update_balance(from_account.id, from_account.balance - request.amount)
        .await?;

    let exchange = tx
        .insert_exchange(NewExchange {
            from_account_no: request.from_account_no,
            to_account_no: request.to_account_no,
            from_routing_no: routing.bank_routing_no,
            to_routing_no: request.to_routing_no,
            amount: request.amount,
            posted: now,
            finished: None,
            status: ExchangeStatus::Posted,
            kind: ExchangeKind::Transfer,
        })
        .await?;

    tx.insert_pool_entry(NewPoolEntry {
        internal_account_id: from_account.id,
        external_account_no: request.to_account_no,
        external_routing_no: request.to_routing_no,
        amount: request.amount,
        inbound: false,
        debit_transfer: false,
        exchange_id: exchange.id,
    })
    .await?;

    info!(
        exchange_id = exchange.id,
        from = %request.from_account_no,
        to_routing = %request.to_routing_no,
        amount = %request.amount,
        "External debit posted"
    );

    Ok(ExchangeReceipt {
        transfer_id: exchange.id,
    })
}
