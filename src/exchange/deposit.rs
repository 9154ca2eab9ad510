//! Deposit handler: inbound leg from another institution.

use chrono::{DateTime, Utc};
use tracing::info;

use super::error::ExchangeError;
use super::types::{ExchangeReceipt, ExchangeRequest};
use crate::auth::AuthClaims;
use crate::config::RoutingConfig;
use crate::model::{ExchangeKind, ExchangeStatus, NewExchange, NewPoolEntry};
use crate::store::LedgerTx;

/// Record an inbound deposit against a local account.
///
/// Gated by ownership of the receiving account plus the shared
/// debit-authorization secret. Does NOT credit the balance: crediting is
/// deferred to the pool reconciler that drains the inbound entry written
/// here. Both routing numbers on the ledger row are recorded as local;
/// the originating institution is only carried on the pool entry.
pub(super) async fn deposit(
    tx: &mut dyn LedgerTx,
    routing: &RoutingConfig,
    claims: &AuthClaims,
    request: &ExchangeRequest,
    now: DateTime<Utc>,
) -> Result<ExchangeReceipt, ExchangeError> {
    if request.amount <= rust_decimal::Decimal::ZERO {
        return Err(ExchangeError::InvalidAmount("deposit"));
    }

    let to_account = tx
        .account_by_number(request.to_account_no)
        .await?
        .ok_or(ExchangeError::AccountNotFound)?;

    let authorized = to_account.owner_id == claims.user_id
        && claims.debit_auth_key.as_deref() == Some(routing.debit_auth_key.as_str());
    if !authorized {
        return Err(ExchangeError::PermissionDenied);
    }

    let exchange = tx
        .insert_exchange(NewExchange {
            from_account_no: request.from_account_no,
            to_account_no: request.to_account_no,
            from_routing_no: routing.bank_routing_no,
            to_routing_no: routing.bank_routing_no,
            amount: request.amount,
            posted: now,
            finished: None,
            status: ExchangeStatus::Posted,
            kind: ExchangeKind::Deposit,
        })
        .await?;

    tx.insert_pool_entry(NewPoolEntry {
        internal_account_id: to_account.id,
        external_account_no: request.from_account_no,
        external_routing_no: request.from_routing_no,
        amount: request.amount,
        inbound: true,
        debit_transfer: true,
        exchange_id: exchange.id,
    })
    .await?;

    info!(
        exchange_id = exchange.id,
        to = %request.to_account_no,
        from_routing = %request.from_routing_no,
        amount = %request.amount,
        "Deposit posted to pool"
    );

    Ok(ExchangeReceipt {
        transfer_id: exchange.id,
    })
}
