//! End-to-end internal transfers through the exchange router.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bankcore::auth::AuthClaims;
use bankcore::config::RoutingConfig;
use bankcore::exchange::{ExchangeRequest, ExchangeRouter, HistoryReader};
use bankcore::model::{AccountNumber, ExchangeStatus, NewAccount, NewCustomer, RoutingNumber};
use bankcore::store::{LedgerStore, LedgerTx, MemoryLedgerStore};

const LOCAL: RoutingNumber = RoutingNumber(21000021);

const ALICE_NO: AccountNumber = AccountNumber(5001);
const BOB_NO: AccountNumber = AccountNumber(5002);

fn routing() -> RoutingConfig {
    RoutingConfig {
        bank_routing_no: LOCAL,
        debit_auth_key: "debit-secret".to_string(),
    }
}

struct Seeded {
    alice_id: i64,
    bob_id: i64,
}

async fn seed(store: &MemoryLedgerStore, alice: Decimal, bob: Decimal) -> Seeded {
    let mut tx = store.begin().await.unwrap();
    let a = tx
        .insert_customer(NewCustomer {
            username: "alice".to_string(),
        })
        .await
        .unwrap();
    let b = tx
        .insert_customer(NewCustomer {
            username: "bob".to_string(),
        })
        .await
        .unwrap();
    tx.insert_account(NewAccount {
        owner_id: a.id,
        account_number: ALICE_NO,
        balance: alice,
    })
    .await
    .unwrap();
    tx.insert_account(NewAccount {
        owner_id: b.id,
        account_number: BOB_NO,
        balance: bob,
    })
    .await
    .unwrap();
    tx.commit().await.unwrap();
    Seeded {
        alice_id: a.id,
        bob_id: b.id,
    }
}

async fn balance_of(store: &MemoryLedgerStore, number: AccountNumber) -> Decimal {
    let mut tx = store.begin().await.unwrap();
    let account = tx.account_by_number(number).await.unwrap().unwrap();
    tx.rollback().await.unwrap();
    account.balance
}

fn request(from: AccountNumber, to: AccountNumber, amount: Decimal) -> ExchangeRequest {
    ExchangeRequest {
        from_account_no: from,
        to_account_no: to,
        from_routing_no: LOCAL,
        to_routing_no: LOCAL,
        amount,
    }
}

#[tokio::test]
async fn test_transfer_moves_money_and_posts_one_record() {
    let store = MemoryLedgerStore::new();
    let seeded = seed(&store, dec!(100), dec!(10)).await;
    let router = ExchangeRouter::new(Arc::new(store.clone()), routing());

    let receipt = router
        .route(
            &AuthClaims::user(seeded.alice_id),
            &request(ALICE_NO, BOB_NO, dec!(40)),
        )
        .await
        .unwrap();

    assert_eq!(balance_of(&store, ALICE_NO).await, dec!(60));
    assert_eq!(balance_of(&store, BOB_NO).await, dec!(50));

    // Exactly one ledger row, settled on the spot, both sides local.
    let mut tx = store.begin().await.unwrap();
    let rows = tx.exchanges_touching(ALICE_NO, LOCAL).await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.id, receipt.transfer_id);
    assert_eq!(row.amount, dec!(40));
    assert_eq!(row.status, ExchangeStatus::Finished);
    assert_eq!(row.finished, Some(row.posted));
    assert_eq!(row.from_routing_no, LOCAL);
    assert_eq!(row.to_routing_no, LOCAL);
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn test_total_balance_is_conserved() {
    let store = MemoryLedgerStore::new();
    let seeded = seed(&store, dec!(100), dec!(10)).await;
    let router = ExchangeRouter::new(Arc::new(store.clone()), routing());

    let alice = AuthClaims::user(seeded.alice_id);
    let bob = AuthClaims::user(seeded.bob_id);
    router
        .route(&alice, &request(ALICE_NO, BOB_NO, dec!(40)))
        .await
        .unwrap();
    router
        .route(&bob, &request(BOB_NO, ALICE_NO, dec!(17.25)))
        .await
        .unwrap();
    router
        .route(&alice, &request(ALICE_NO, BOB_NO, dec!(0.75)))
        .await
        .unwrap();

    let total = balance_of(&store, ALICE_NO).await + balance_of(&store, BOB_NO).await;
    assert_eq!(total, dec!(110));
}

#[tokio::test]
async fn test_rejections_leave_no_trace() {
    let store = MemoryLedgerStore::new();
    let seeded = seed(&store, dec!(100), dec!(10)).await;
    let router = ExchangeRouter::new(Arc::new(store.clone()), routing());
    let alice = AuthClaims::user(seeded.alice_id);

    // Wire-level checks: stable failure shape with the message callers see.
    let cases = [
        (request(ALICE_NO, BOB_NO, dec!(150)), "insufficient funds"),
        (
            request(ALICE_NO, BOB_NO, dec!(0)),
            "you can only transfer non-zero positive sums of money",
        ),
        (
            request(ALICE_NO, BOB_NO, dec!(-5)),
            "you can only transfer non-zero positive sums of money",
        ),
        (request(ALICE_NO, ALICE_NO, dec!(5)), "invalid transfer"),
        (
            request(AccountNumber(999999), BOB_NO, dec!(5)),
            "one of the accounts specified does not exist",
        ),
        // Bob's account does not belong to Alice.
        (request(BOB_NO, ALICE_NO, dec!(5)), "insufficient permission"),
    ];
    for (req, msg) in cases {
        let response = router.start_exchange(&alice, &req).await;
        assert!(!response.success);
        assert_eq!(response.msg.as_deref(), Some(msg));
        assert!(response.data.is_none());
    }

    // Nothing moved and nothing was written.
    assert_eq!(balance_of(&store, ALICE_NO).await, dec!(100));
    assert_eq!(balance_of(&store, BOB_NO).await, dec!(10));
    let mut tx = store.begin().await.unwrap();
    assert!(tx.exchanges_touching(ALICE_NO, LOCAL).await.unwrap().is_empty());
    assert!(tx.exchanges_touching(BOB_NO, LOCAL).await.unwrap().is_empty());
    tx.rollback().await.unwrap();
}

#[tokio::test]
async fn test_history_signs_follow_the_queried_account() {
    let store = MemoryLedgerStore::new();
    let seeded = seed(&store, dec!(100), dec!(10)).await;
    let router = ExchangeRouter::new(Arc::new(store.clone()), routing());
    let reader = HistoryReader::new(Arc::new(store.clone()), routing());

    let alice = AuthClaims::user(seeded.alice_id);
    let bob = AuthClaims::user(seeded.bob_id);
    router
        .route(&alice, &request(ALICE_NO, BOB_NO, dec!(40)))
        .await
        .unwrap();
    router
        .route(&bob, &request(BOB_NO, ALICE_NO, dec!(5)))
        .await
        .unwrap();

    // Same two rows, opposite signs depending on who asks.
    let from_alice: Vec<Decimal> = reader
        .history(&alice, ALICE_NO)
        .await
        .unwrap()
        .iter()
        .map(|r| r.amount)
        .collect();
    assert_eq!(from_alice, vec![dec!(-40), dec!(5)]);

    let from_bob: Vec<Decimal> = reader
        .history(&bob, BOB_NO)
        .await
        .unwrap()
        .iter()
        .map(|r| r.amount)
        .collect();
    assert_eq!(from_bob, vec![dec!(40), dec!(-5)]);
}
