//! Account-side entities.
//!
//! Customer and account CRUD live in an external service; this core only
//! looks entities up (and seeds them in tests). Balances are fixed-point
//! decimals and may only be touched inside a ledger-store transaction that
//! also writes the matching exchange record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ids::{AccountId, AccountNumber, CustomerId, ExternalAccountId, RoutingNumber};

/// A customer known to the bank (account owner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub username: String,
}

/// An account held at this bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner_id: CustomerId,
    pub account_number: AccountNumber,
    /// Never negative after a committed operation
    pub balance: Decimal,
}

/// A customer-registered account at another institution.
///
/// Targets of queued external transfers must be registered here before they
/// can be processed; the pool reconciler settles against these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalAccount {
    pub id: ExternalAccountId,
    pub owner_id: CustomerId,
    pub account_number: AccountNumber,
    pub routing_number: RoutingNumber,
}

/// Insert payload for a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub username: String,
}

/// Insert payload for an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub owner_id: CustomerId,
    pub account_number: AccountNumber,
    pub balance: Decimal,
}

/// Insert payload for an external account registration.
#[derive(Debug, Clone)]
pub struct NewExternalAccount {
    pub owner_id: CustomerId,
    pub account_number: AccountNumber,
    pub routing_number: RoutingNumber,
}
