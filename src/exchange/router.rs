//! Exchange Router
//!
//! Entry point for all routed money movement. Classifies a transfer by
//! comparing its routing numbers to the bank's own, dispatches to exactly
//! one handler, and runs the whole thing inside a single ledger
//! transaction: callers never observe partial state.

use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use super::deposit::deposit;
use super::error::ExchangeError;
use super::external::external_debit;
use super::internal::internal_transfer;
use super::types::{ExchangeReceipt, ExchangeRequest, ExchangeResponse};
use crate::auth::AuthClaims;
use crate::config::RoutingConfig;
use crate::store::{LedgerStore, LedgerTx};

pub struct ExchangeRouter {
    store: Arc<dyn LedgerStore>,
    routing: RoutingConfig,
}

impl ExchangeRouter {
    pub fn new(store: Arc<dyn LedgerStore>, routing: RoutingConfig) -> Self {
        Self { store, routing }
    }

    /// Route and execute one transfer. Decision table, evaluated in order:
    /// local→local = internal, local→remote = external debit,
    /// remote→local = deposit, remote→remote = unroutable.
    pub async fn route(
        &self,
        claims: &AuthClaims,
        request: &ExchangeRequest,
    ) -> Result<ExchangeReceipt, ExchangeError> {
        let from_local = self.routing.is_local(request.from_routing_no);
        let to_local = self.routing.is_local(request.to_routing_no);

        if !from_local && !to_local {
            debug!(
                from_routing = %request.from_routing_no,
                to_routing = %request.to_routing_no,
                "Unroutable transfer"
            );
            return Err(ExchangeError::Unroutable);
        }

        let now = Utc::now();
        let mut tx = self.store.begin().await?;

        let result = if from_local && to_local {
            internal_transfer(tx.as_mut(), &self.routing, claims, request, now).await
        } else if from_local {
            external_debit(tx.as_mut(), &self.routing, claims, request, now).await
        } else {
            deposit(tx.as_mut(), &self.routing, claims, request, now).await
        };

        match result {
            Ok(receipt) => {
                tx.commit().await?;
                Ok(receipt)
            }
            Err(err) => {
                tx.rollback().await?;
                debug!(code = err.code(), "Exchange rejected");
                Err(err)
            }
        }
    }

    /// Same as [`route`](Self::route), folded into the stable wire shape.
    pub async fn start_exchange(
        &self,
        claims: &AuthClaims,
        request: &ExchangeRequest,
    ) -> ExchangeResponse {
        self.route(claims, request).await.into()
    }
}
