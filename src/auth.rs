//! Verified identity claims.
//!
//! Token decryption and verification happen in an external auth service;
//! this core only ever sees the already-verified claims record.

use serde::{Deserialize, Serialize};

use crate::model::CustomerId;

/// Claims carried by a verified auth token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Authenticated customer id
    pub user_id: CustomerId,
    /// Present when the caller holds a manager role (authorization elevation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<CustomerId>,
    /// Shared-secret credential authorizing inbound debits (deposits)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debit_auth_key: Option<String>,
}

impl AuthClaims {
    /// Claims for a plain customer.
    pub fn user(user_id: CustomerId) -> Self {
        Self {
            user_id,
            manager_id: None,
            debit_auth_key: None,
        }
    }

    /// Claims carrying a manager elevation.
    pub fn manager(user_id: CustomerId, manager_id: CustomerId) -> Self {
        Self {
            user_id,
            manager_id: Some(manager_id),
            debit_auth_key: None,
        }
    }

    /// Attach a debit-authorization credential.
    pub fn with_debit_auth(mut self, key: impl Into<String>) -> Self {
        self.debit_auth_key = Some(key.into());
        self
    }

    pub fn is_manager(&self) -> bool {
        self.manager_id.is_some()
    }
}
