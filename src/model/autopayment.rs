//! Recurring payment definitions.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AccountId, CustomerId};
use super::transfer::TransferKind;

/// How often a scheduled payment fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl PaymentFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Daily => "DAILY",
            PaymentFrequency::Weekly => "WEEKLY",
            PaymentFrequency::Monthly => "MONTHLY",
            PaymentFrequency::Yearly => "YEARLY",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DAILY" => Ok(PaymentFrequency::Daily),
            "WEEKLY" => Ok(PaymentFrequency::Weekly),
            "MONTHLY" => Ok(PaymentFrequency::Monthly),
            "YEARLY" => Ok(PaymentFrequency::Yearly),
            _ => Err(format!("Invalid payment frequency: {}", s)),
        }
    }
}

/// Payment window and cadence; owned 1:1 by its autopayment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: PaymentFrequency,
}

/// A recurring transfer definition owned by a customer.
///
/// `autopayment_id` is the owner's running sequence (0, 1, 2, ...); `id` is
/// globally unique. Both are assigned atomically by the store. The periodic
/// runner updates `last_payment` after a fired transfer succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Autopayment {
    pub id: i64,
    pub owner_id: CustomerId,
    pub autopayment_id: i64,
    pub schedule: PaymentSchedule,
    pub from_account: AccountId,
    /// Internal account id for U_TO_U payments, external-account id for EXTERN
    pub to_account_ref: i64,
    pub amount: Decimal,
    pub kind: TransferKind,
    pub last_payment: Option<DateTime<Utc>>,
}

/// Composite key returned to the caller: (owner, per-owner sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutopaymentKey {
    pub owner_id: CustomerId,
    pub autopayment_id: i64,
}

/// Insert payload; both ids are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAutopayment {
    pub owner_id: CustomerId,
    pub schedule: PaymentSchedule,
    pub from_account: AccountId,
    pub to_account_ref: i64,
    pub amount: Decimal,
    pub kind: TransferKind,
}
