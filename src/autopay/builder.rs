//! Autopayment Builder
//!
//! Validates and registers recurring payment definitions. Accounts may be
//! referenced by internal id or by account number; the stored definition
//! always carries resolved ids. Registration runs in one transaction so a
//! failed validation leaves nothing behind.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::error::AutopayError;
use crate::auth::AuthClaims;
use crate::model::{
    Account, AccountNumber, AutopaymentKey, NewAutopayment, PaymentFrequency, PaymentSchedule,
    TransferKind,
};
use crate::store::{LedgerStore, LedgerTx};

/// A reference to an account, by internal id or by account number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRef {
    Id(i64),
    Number(AccountNumber),
}

/// Schedule fields as submitted. The frequency arrives as text and is
/// validated during registration.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: String,
}

#[derive(Debug, Clone)]
pub struct AutopaymentRequest {
    pub schedule: ScheduleRequest,
    pub from_account: AccountRef,
    pub to_account: AccountRef,
    pub amount: Decimal,
    pub kind: TransferKind,
}

pub struct AutopaymentBuilder {
    store: Arc<dyn LedgerStore>,
}

impl AutopaymentBuilder {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a recurring payment for the calling customer.
    ///
    /// Checks run in order: the owner and both accounts must resolve, the
    /// source account must belong to the caller, and the frequency must
    /// parse. Ids are assigned by the store; `autopayment_id` counts up
    /// from zero per owner.
    pub async fn build_autopayment(
        &self,
        claims: &AuthClaims,
        request: &AutopaymentRequest,
    ) -> Result<AutopaymentKey, AutopayError> {
        let mut tx = self.store.begin().await?;

        match build_inner(tx.as_mut(), claims, request).await {
            Ok(key) => {
                tx.commit().await?;
                Ok(key)
            }
            Err(err) => {
                tx.rollback().await?;
                debug!(code = err.code(), "Autopayment rejected");
                Err(err)
            }
        }
    }
}

async fn build_inner(
    tx: &mut dyn LedgerTx,
    claims: &AuthClaims,
    request: &AutopaymentRequest,
) -> Result<AutopaymentKey, AutopayError> {
    let owner = tx
        .customer_by_id(claims.user_id)
        .await?
        .ok_or(AutopayError::AccountNotFound)?;

    let from = resolve_account(tx, request.from_account).await?;

    // External targets resolve against registered external accounts; any
    // other kind resolves against this bank's accounts and is stored as
    // an internal payment.
    let (kind, to_account_ref) = match request.kind {
        TransferKind::External => {
            let to = match request.to_account {
                AccountRef::Id(id) => tx.external_account_by_id(id).await?,
                AccountRef::Number(number) => tx.external_account_by_number(number).await?,
            };
            let to = to.ok_or(AutopayError::AccountNotFound)?;
            (TransferKind::External, to.id)
        }
        _ => {
            let to = resolve_account(tx, request.to_account).await?;
            (TransferKind::Internal, to.id)
        }
    };

    if from.owner_id != owner.id {
        return Err(AutopayError::PermissionDenied);
    }

    let frequency: PaymentFrequency = request
        .schedule
        .frequency
        .parse()
        .map_err(|_| AutopayError::ValidationFailure("unknown payment frequency"))?;

    let autopayment = tx
        .insert_autopayment(NewAutopayment {
            owner_id: owner.id,
            schedule: PaymentSchedule {
                start_date: request.schedule.start_date,
                end_date: request.schedule.end_date,
                frequency,
            },
            from_account: from.id,
            to_account_ref,
            amount: request.amount,
            kind,
        })
        .await?;

    info!(
        owner_id = autopayment.owner_id,
        autopayment_id = autopayment.autopayment_id,
        frequency = %frequency,
        "Autopayment registered"
    );

    Ok(AutopaymentKey {
        owner_id: autopayment.owner_id,
        autopayment_id: autopayment.autopayment_id,
    })
}

async fn resolve_account(
    tx: &mut dyn LedgerTx,
    account: AccountRef,
) -> Result<Account, AutopayError> {
    let found = match account {
        AccountRef::Id(id) => tx.account_by_id(id).await?,
        AccountRef::Number(number) => tx.account_by_number(number).await?,
    };
    found.ok_or(AutopayError::AccountNotFound)
}
