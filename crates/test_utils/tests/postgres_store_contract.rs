//! Store contract run against PostgreSQL
//!
//! Needs Docker. Run with `cargo test -p test_utils -- --ignored`.

use std::sync::Arc;

use domain_ledger::TransactionStore;
use infra_db::PostgresTransactionStore;
use test_utils::contract::run_store_contract;
use test_utils::{TestDatabase, TestTransactionBuilder};

#[tokio::test]
#[ignore = "requires Docker"]
async fn postgres_store_satisfies_contract() {
    let db = TestDatabase::new().await.expect("failed to start test database");

    run_store_contract(|| {
        let db = &db;
        async move {
            db.clear_data().await.expect("failed to clear data");
            Arc::new(PostgresTransactionStore::new(db.pool().clone())) as Arc<dyn TransactionStore>
        }
    })
    .await;
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn postgres_rejects_rows_violating_checks() {
    let db = TestDatabase::new().await.expect("failed to start test database");
    let store = PostgresTransactionStore::new(db.pool().clone());

    let blank_category = TestTransactionBuilder::income(100).with_category("   ").build();
    let zero_amount = TestTransactionBuilder::expense(0).build();

    for row in [blank_category, zero_amount] {
        let err = store.create(&row).await.unwrap_err();
        assert!(
            matches!(err, core_kernel::PortError::Validation { .. }),
            "expected Validation, got {:?}",
            err
        );
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn postgres_summary_overflow_is_an_error() {
    let db = TestDatabase::new().await.expect("failed to start test database");
    let store = PostgresTransactionStore::new(db.pool().clone());

    for _ in 0..2 {
        store
            .create(&TestTransactionBuilder::income(i64::MAX).build())
            .await
            .unwrap();
    }

    let err = store
        .monthly_summary(test_utils::TemporalFixtures::november_2025())
        .await
        .unwrap_err();
    assert!(matches!(err, core_kernel::PortError::Internal { .. }));
}
