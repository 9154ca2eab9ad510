//! History Reader
//!
//! Reconstructs one account's view of the exchange ledger. Only legs where
//! the account appears on a locally-routed side are visible; purely
//! external movement through the pool is not part of this view.

use std::sync::Arc;
use tracing::debug;

use super::error::ExchangeError;
use super::types::HistoryRecord;
use crate::auth::AuthClaims;
use crate::config::RoutingConfig;
use crate::model::AccountNumber;
use crate::store::{LedgerStore, LedgerTx};

pub struct HistoryReader {
    store: Arc<dyn LedgerStore>,
    routing: RoutingConfig,
}

impl HistoryReader {
    pub fn new(store: Arc<dyn LedgerStore>, routing: RoutingConfig) -> Self {
        Self { store, routing }
    }

    /// All exchanges touching `account_no` on a local side, posting-time
    /// ascending. Amounts are sign-normalized from the queried account's
    /// point of view: negative when it is the local from-side, positive
    /// otherwise. Readable by the account owner or any manager.
    pub async fn history(
        &self,
        claims: &AuthClaims,
        account_no: AccountNumber,
    ) -> Result<Vec<HistoryRecord>, ExchangeError> {
        let mut tx = self.store.begin().await?;
        let result = self.fetch(tx.as_mut(), claims, account_no).await;
        match result {
            Ok(records) => {
                tx.commit().await?;
                Ok(records)
            }
            Err(err) => {
                tx.rollback().await?;
                debug!(account_no = %account_no, code = err.code(), "History read rejected");
                Err(err)
            }
        }
    }

    async fn fetch(
        &self,
        tx: &mut dyn LedgerTx,
        claims: &AuthClaims,
        account_no: AccountNumber,
    ) -> Result<Vec<HistoryRecord>, ExchangeError> {
        let account = tx
            .account_by_number(account_no)
            .await?
            .ok_or(ExchangeError::AccountNotFound)?;

        if account.owner_id != claims.user_id && !claims.is_manager() {
            return Err(ExchangeError::PermissionDenied);
        }

        let local = self.routing.bank_routing_no;
        let rows = tx.exchanges_touching(account_no, local).await?;

        Ok(rows
            .into_iter()
            .map(|x| {
                let outgoing = x.from_account_no == account_no && x.from_routing_no == local;
                HistoryRecord {
                    id: x.id,
                    from_account_no: x.from_account_no,
                    to_account_no: x.to_account_no,
                    from_routing_no: x.from_routing_no,
                    to_routing_no: x.to_routing_no,
                    amount: if outgoing { -x.amount } else { x.amount },
                    posted: x.posted,
                    finished: x.finished,
                    status: x.status,
                    kind: x.kind,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::router::ExchangeRouter;
    use crate::exchange::types::ExchangeRequest;
    use crate::model::{NewAccount, NewCustomer, RoutingNumber};
    use crate::store::MemoryLedgerStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const LOCAL: RoutingNumber = RoutingNumber(110000);
    const REMOTE: RoutingNumber = RoutingNumber(990000);

    fn routing() -> RoutingConfig {
        RoutingConfig {
            bank_routing_no: LOCAL,
            debit_auth_key: "hunter2".to_string(),
        }
    }

    async fn seed_account(store: &MemoryLedgerStore, number: i64, balance: Decimal) -> i64 {
        let mut tx = store.begin().await.unwrap();
        let customer = tx
            .insert_customer(NewCustomer {
                username: format!("cust_{}", number),
            })
            .await
            .unwrap();
        tx.insert_account(NewAccount {
            owner_id: customer.id,
            account_number: AccountNumber(number),
            balance,
        })
        .await
        .unwrap();
        tx.commit().await.unwrap();
        customer.id
    }

    #[tokio::test]
    async fn test_history_signs_and_visibility() {
        let store = MemoryLedgerStore::new();
        let alice = seed_account(&store, 100, dec!(100)).await;
        let bob = seed_account(&store, 200, dec!(10)).await;
        let router = ExchangeRouter::new(Arc::new(store.clone()), routing());
        let reader = HistoryReader::new(Arc::new(store), routing());

        // Alice sends 40 to Bob internally, then 5 outbound, then receives
        // a 7 deposit from a remote institution.
        let claims = AuthClaims::user(alice).with_debit_auth("hunter2");
        router
            .route(
                &claims,
                &ExchangeRequest {
                    from_account_no: AccountNumber(100),
                    to_account_no: AccountNumber(200),
                    from_routing_no: LOCAL,
                    to_routing_no: LOCAL,
                    amount: dec!(40),
                },
            )
            .await
            .unwrap();
        router
            .route(
                &claims,
                &ExchangeRequest {
                    from_account_no: AccountNumber(100),
                    to_account_no: AccountNumber(777),
                    from_routing_no: LOCAL,
                    to_routing_no: REMOTE,
                    amount: dec!(5),
                },
            )
            .await
            .unwrap();
        router
            .route(
                &claims,
                &ExchangeRequest {
                    from_account_no: AccountNumber(777),
                    to_account_no: AccountNumber(100),
                    from_routing_no: REMOTE,
                    to_routing_no: LOCAL,
                    amount: dec!(7),
                },
            )
            .await
            .unwrap();

        // Alice's view: -40, -5, +7 in posting order.
        let records = reader
            .history(&AuthClaims::user(alice), AccountNumber(100))
            .await
            .unwrap();
        let amounts: Vec<Decimal> = records.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![dec!(-40), dec!(-5), dec!(7)]);

        // Bob's view: only the internal credit.
        let records = reader
            .history(&AuthClaims::user(bob), AccountNumber(200))
            .await
            .unwrap();
        let amounts: Vec<Decimal> = records.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![dec!(40)]);
    }

    #[tokio::test]
    async fn test_history_permissions() {
        let store = MemoryLedgerStore::new();
        let alice = seed_account(&store, 100, dec!(100)).await;
        let bob = seed_account(&store, 200, dec!(10)).await;
        let reader = HistoryReader::new(Arc::new(store), routing());

        // A stranger is denied.
        let result = reader
            .history(&AuthClaims::user(bob), AccountNumber(100))
            .await;
        assert!(matches!(result, Err(ExchangeError::PermissionDenied)));

        // A manager may read any account.
        let result = reader
            .history(&AuthClaims::manager(bob, 1), AccountNumber(100))
            .await;
        assert!(result.is_ok());

        // The owner may read their own.
        let result = reader
            .history(&AuthClaims::user(alice), AccountNumber(100))
            .await;
        assert!(result.is_ok());

        // Unknown accounts are reported, not silently empty.
        let result = reader
            .history(&AuthClaims::user(alice), AccountNumber(999))
            .await;
        assert!(matches!(result, Err(ExchangeError::AccountNotFound)));
    }
}
