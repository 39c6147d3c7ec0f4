use sea_orm::Database;
use serde_json::json;

use engine::store::{DocumentStore, SqlStore, collections};
use engine::{Engine, MoneyCents, TransactionDraft, TransactionKind, WalletDraft};
use migration::MigratorTrait;

async fn store() -> SqlStore {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    SqlStore::new(db)
}

#[tokio::test]
async fn documents_round_trip_in_insertion_order() {
    let store = store().await;

    let first = store
        .create("alice", collections::WALLETS, json!({"name": "Efectivo", "balance": 0}))
        .await
        .unwrap();
    let second = store
        .create("alice", collections::WALLETS, json!({"name": "Banco", "balance": 100}))
        .await
        .unwrap();

    let docs = store.list_all("alice", collections::WALLETS).await.unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id, first);
    assert_eq!(docs[0].fields["name"], "Efectivo");
    assert_eq!(docs[1].id, second);
    assert_eq!(docs[1].fields["name"], "Banco");
}

#[tokio::test]
async fn namespaces_and_collections_are_isolated() {
    let store = store().await;

    store
        .create("alice", collections::WALLETS, json!({"name": "Efectivo"}))
        .await
        .unwrap();

    assert!(store
        .list_all("bob", collections::WALLETS)
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .list_all("alice", collections::BUDGETS)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn update_replaces_the_field_payload() {
    let store = store().await;

    let id = store
        .create("alice", collections::CATEGORIES, json!({"income": [], "expense": []}))
        .await
        .unwrap();
    store
        .update(
            "alice",
            collections::CATEGORIES,
            &id,
            json!({"income": ["Salario"], "expense": []}),
        )
        .await
        .unwrap();

    let docs = store
        .list_all("alice", collections::CATEGORIES)
        .await
        .unwrap();
    assert_eq!(docs[0].fields["income"], json!(["Salario"]));
}

#[tokio::test]
async fn update_of_a_missing_document_fails() {
    let store = store().await;
    let result = store
        .update("alice", collections::CATEGORIES, "missing", json!({}))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let store = store().await;

    let id = store
        .create("alice", collections::TRANSACTIONS, json!({"amount": 100}))
        .await
        .unwrap();
    store
        .delete("alice", collections::TRANSACTIONS, &id)
        .await
        .unwrap();
    store
        .delete("alice", collections::TRANSACTIONS, &id)
        .await
        .unwrap();

    assert!(store
        .list_all("alice", collections::TRANSACTIONS)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn engine_state_survives_a_remount() {
    let store = store().await;

    {
        let mut finance = Engine::load(store.clone(), "alice").await.unwrap();
        let wallet_id = finance
            .add_wallet(WalletDraft {
                name: "Efectivo".to_string(),
                balance: "100".to_string(),
            })
            .await
            .unwrap()
            .id
            .clone();
        finance
            .add_transaction(TransactionDraft {
                amount: "30".to_string(),
                kind: TransactionKind::Expense,
                wallet_id,
                category: "Comida".to_string(),
                date: "2024-01-01".parse().unwrap(),
                note: Some("Almuerzo".to_string()),
            })
            .await
            .unwrap();
    }

    let finance = Engine::load(store.clone(), "alice").await.unwrap();
    assert_eq!(finance.wallets().len(), 1);
    assert_eq!(finance.transactions().len(), 1);
    assert_eq!(finance.total_expenses(), MoneyCents::new(3000));
    assert_eq!(finance.total_balance(), MoneyCents::new(10_000));
    assert_eq!(finance.transactions()[0].note.as_deref(), Some("Almuerzo"));

    // Categories were seeded by the first mount only.
    let docs = store
        .list_all("alice", collections::CATEGORIES)
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
}
