//! Identifier types used throughout the ledger.
//!
//! Row ids are plain `i64` aliases (PostgreSQL BIGINT sequences assign them).
//! Account and routing numbers get real newtypes: routing-number equality
//! against the bank's own number is the core routing decision, and mixing
//! the two up must not compile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Customer (account owner) id
pub type CustomerId = i64;

/// Internal account row id
pub type AccountId = i64;

/// Registered external-account row id
pub type ExternalAccountId = i64;

/// Exchange ledger entry id
pub type ExchangeId = i64;

/// Queued transfer id
pub type TransferId = i64;

/// External transfer pool entry id
pub type PoolEntryId = i64;

/// Audit event id
pub type EventId = i64;

/// Bank account number (unique within an institution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(pub i64);

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountNumber {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Routing number of the financial institution owning an account.
///
/// Equality to the local bank's routing number distinguishes internal from
/// external legs of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingNumber(pub i64);

impl fmt::Display for RoutingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoutingNumber {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
