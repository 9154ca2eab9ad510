//! Exchange ledger entries.
//!
//! One record per balance-affecting event. Records are immutable once
//! posted except for the `finished` timestamp and the status transition;
//! the amount is always stored positive, direction is inferred from which
//! side's routing number matches the local bank.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountNumber, ExchangeId, RoutingNumber};

/// Exchange record status.
///
/// POSTED = recorded, not yet settled; FINISHED = settled. Ids are designed
/// for storage as SMALLINT, failure negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum ExchangeStatus {
    /// Recorded; settlement with the counterparty institution is pending
    Posted = 1,
    /// Settled; both legs complete
    Finished = 2,
    /// Terminal failure
    Failed = -1,
}

impl ExchangeStatus {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(ExchangeStatus::Posted),
            2 => Some(ExchangeStatus::Finished),
            -1 => Some(ExchangeStatus::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeStatus::Posted => "POSTED",
            ExchangeStatus::Finished => "FINISHED",
            ExchangeStatus::Failed => "FAILED",
        }
    }

    /// Settled both ways, no reconciliation pending.
    #[inline]
    pub fn is_settled(&self) -> bool {
        matches!(self, ExchangeStatus::Finished)
    }
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exchange record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum ExchangeKind {
    Transfer = 1,
    Deposit = 2,
}

impl ExchangeKind {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(ExchangeKind::Transfer),
            2 => Some(ExchangeKind::Deposit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeKind::Transfer => "TRANSFER",
            ExchangeKind::Deposit => "DEPOSIT",
        }
    }
}

impl fmt::Display for ExchangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A posted exchange ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    pub id: ExchangeId,
    pub from_account_no: AccountNumber,
    pub to_account_no: AccountNumber,
    pub from_routing_no: RoutingNumber,
    pub to_routing_no: RoutingNumber,
    /// Always positive; direction is inferred from the routing numbers
    pub amount: Decimal,
    pub posted: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub status: ExchangeStatus,
    pub kind: ExchangeKind,
}

/// Insert payload for a new exchange record (id assigned by the store).
#[derive(Debug, Clone)]
pub struct NewExchange {
    pub from_account_no: AccountNumber,
    pub to_account_no: AccountNumber,
    pub from_routing_no: RoutingNumber,
    pub to_routing_no: RoutingNumber,
    pub amount: Decimal,
    pub posted: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub status: ExchangeStatus,
    pub kind: ExchangeKind,
}
