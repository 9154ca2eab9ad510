//! Internal transfer handler: both legs held at this bank.

use chrono::{DateTime, Utc};
use tracing::info;

use super::error::ExchangeError;
use super::types::{ExchangeReceipt, ExchangeRequest};
use crate::auth::AuthClaims;
use crate::config::RoutingConfig;
use crate::model::{ExchangeKind, ExchangeStatus, NewExchange};
use crate::store::LedgerTx;

/// Move money between two local accounts and post one FINISHED ledger row.
///
/// Precondition checks run in a fixed order and the first failure is the
/// outcome; nothing is written unless all pass. The caller owns the
/// transaction and must roll back on error.
pub(super) async fn internal_transfer(
    tx: &mut dyn LedgerTx,
    routing: &RoutingConfig,
    claims: &AuthClaims,
    request: &ExchangeRequest,
    now: DateTime<Utc>,
) -> Result<ExchangeReceipt, ExchangeError> {
    if request.amount <= rust_decimal::Decimal::ZERO {
        return Err(ExchangeError::InvalidAmount("transfer"));
    }

    let from_account = tx.account_by_number(request.from_account_no).await?;
    let to_account = tx.account_by_number(request.to_account_no).await?;
    let (from_account, to_account) = match (from_account, to_account) {
        (Some(from), Some(to)) => (from, to),
        _ => return Err(ExchangeError::AccountNotFound),
    };

    if from_account.id == to_account.id {
        return Err(ExchangeError::InvalidTransfer);
    }
    if from_account.owner_id != claims.user_id {
        return Err(ExchangeError::PermissionDenied);
    }

    // Re-read both balances under row locks before deciding. Locks are
    // taken in id order so concurrent opposite transfers cannot deadlock.
    let (first_id, second_id) = if from_account.id < to_account.id {
        (from_account.id, to_account.id)
    } else {
        (to_account.id, from_account.id)
    };
    let first = tx
        .account_for_update(first_id)
        .await?
        .ok_or(ExchangeError::AccountNotFound)?;
    let second = tx
        .account_for_update(second_id)
        .await?
        .ok_or(ExchangeError::AccountNotFound)?;
    let (from_account, to_account) = if first.id == from_account.id {
        (first, second)
    } else {
        (second, first)
    };

    if request.amount > from_account.balance {
        return Err(ExchangeError::InsufficientFunds);
    }

    tx.update_balance(from_account.id, from_account.balance - request.amount)
        .await?;
    tx.update_balance(to_account.id, to_account.balance + request.amount)
        .await?;

    let exchange = tx
        .insert_exchange(NewExchange {
            from_account_no: request.from_account_no,
            to_account_no: request.to_account_no,
            from_routing_no: routing.bank_routing_no,
            to_routing_no: routing.bank_routing_no,
            amount: request.amount,
            posted: now,
            finished: Some(now),
            status: ExchangeStatus::Finished,
            kind: ExchangeKind::Transfer,
        })
        .await?;

    info!(
        exchange_id = exchange.id,
        from = %request.from_account_no,
        to = %request.to_account_no,
        amount = %request.amount,
        "Internal transfer settled"
    );

    Ok(ExchangeReceipt {
        transfer_id: exchange.id,
    })
}
