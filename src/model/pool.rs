//! External transfer pool.
//!
//! A pool entry records money in flight between the local ledger and
//! another institution. Entries are written when an external leg posts,
//! never mutated, and retained for the (out of scope) reconciliation
//! process that settles them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{AccountId, AccountNumber, ExchangeId, PoolEntryId, RoutingNumber};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub id: PoolEntryId,
    /// Local account the in-flight money belongs to or came from
    pub internal_account_id: AccountId,
    pub external_account_no: AccountNumber,
    pub external_routing_no: RoutingNumber,
    pub amount: Decimal,
    /// true = money flowing into this bank, false = flowing out
    pub inbound: bool,
    /// true when the entry was created by a debit-initiated exchange
    pub debit_transfer: bool,
    /// Back-reference to the exchange record that posted this leg
    pub exchange_id: ExchangeId,
}

/// Insert payload for a new pool entry (id assigned by the store).
#[derive(Debug, Clone)]
pub struct NewPoolEntry {
    pub internal_account_id: AccountId,
    pub external_account_no: AccountNumber,
    pub external_routing_no: RoutingNumber,
    pub amount: Decimal,
    pub inbound: bool,
    pub debit_transfer: bool,
    pub exchange_id: ExchangeId,
}
