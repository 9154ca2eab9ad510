//! Queued transfers and their two-table state machine.
//!
//! A `Transfer` row is the queued intent. While queued it is referenced by
//! a `PendingTransfer` entry; successful processing deletes that entry and
//! appends a `CompletedTransfer` log entry in the same transaction. The
//! observable phase is derived from that table membership, not stored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AccountId, EventId, ExternalAccountId, TransferId};

/// Transfer kind tag, dispatched on by handlers.
///
/// Wire names match the ledger's historical values ("U_TO_U" for
/// user-to-user inside this bank, "EXTERN" for inter-bank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i16)]
pub enum TransferKind {
    #[serde(rename = "U_TO_U")]
    Internal = 1,
    #[serde(rename = "EXTERN")]
    External = 2,
}

impl TransferKind {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(TransferKind::Internal),
            2 => Some(TransferKind::External),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferKind::Internal => "U_TO_U",
            TransferKind::External => "EXTERN",
        }
    }
}

impl fmt::Display for TransferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransferKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "U_TO_U" => Ok(TransferKind::Internal),
            "EXTERN" => Ok(TransferKind::External),
            _ => Err(format!("Invalid transfer kind: {}", s)),
        }
    }
}

/// Per-transfer lifecycle phase.
///
/// `Requested` exists only before the queuing transaction commits and
/// `Processing` only inside the processing transaction; callers observe
/// `Queued`, `Completed`, or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum TransferPhase {
    Requested = 0,
    Queued = 10,
    Processing = 20,
    Completed = 30,
    Rejected = -10,
}

impl TransferPhase {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferPhase::Completed | TransferPhase::Rejected)
    }

    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(TransferPhase::Requested),
            10 => Some(TransferPhase::Queued),
            20 => Some(TransferPhase::Processing),
            30 => Some(TransferPhase::Completed),
            -10 => Some(TransferPhase::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferPhase::Requested => "REQUESTED",
            TransferPhase::Queued => "QUEUED",
            TransferPhase::Processing => "PROCESSING",
            TransferPhase::Completed => "COMPLETED",
            TransferPhase::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A queued transfer intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub from_account: AccountId,
    /// External-account reference for EXTERN transfers; an internal
    /// account id would sit here for queued U_TO_U intents
    pub to_account: ExternalAccountId,
    pub kind: TransferKind,
    pub amount: Decimal,
    /// Audit event written when the transfer was queued
    pub create_event_id: EventId,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new transfer row (id assigned by the store).
#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub from_account: AccountId,
    pub to_account: ExternalAccountId,
    pub kind: TransferKind,
    pub amount: Decimal,
    pub create_event_id: EventId,
    pub created_at: DateTime<Utc>,
}

/// Queue membership row: exists only while the transfer is queued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTransfer {
    pub transfer_id: TransferId,
    pub added: DateTime<Utc>,
}

/// Append-only completion log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTransfer {
    pub transfer_id: TransferId,
    /// Original enqueue time, carried over from the pending entry
    pub started: DateTime<Utc>,
    pub completed: DateTime<Utc>,
}
