//! bankcore - Retail Banking Money Movement Core
//!
//! A ledger-backed transfer engine in Rust: every balance change runs in a
//! store transaction and leaves an exchange record behind.
//!
//! # Modules
//!
//! - [`model`] - Core domain types (accounts, exchanges, transfers, events)
//! - [`store`] - Transactional ledger store (in-memory and PostgreSQL)
//! - [`exchange`] - Routed transfers: internal, external debit, deposit, history
//! - [`pending`] - Two-phase external transfers (queue now, settle later)
//! - [`autopay`] - Recurring payments: registration and due-date evaluation
//! - [`auth`] - Caller identity and permissions
//! - [`config`] - Per-environment configuration
//! - [`logging`] - Structured log setup

// Domain types - must be first!
pub mod model;

// Persistence
pub mod store;

// Money movement
pub mod autopay;
pub mod exchange;
pub mod pending;

// Ambient plumbing
pub mod auth;
pub mod config;
pub mod logging;

// Convenient re-exports at crate root
pub use auth::AuthClaims;
pub use autopay::{AutopaymentBuilder, is_payment_due};
pub use config::{BankConfig, RoutingConfig};
pub use exchange::{
    ExchangeError, ExchangeRequest, ExchangeResponse, ExchangeRouter, HistoryReader,
};
pub use model::{Account, AccountNumber, Customer, ExchangeRecord, RoutingNumber};
pub use pending::{ExternalWorkflow, WorkflowError};
pub use store::{LedgerStore, LedgerTx, MemoryLedgerStore, PgLedgerStore, StoreError};
