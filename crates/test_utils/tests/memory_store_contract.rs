//! Store contract run against the in-memory backend

use std::sync::Arc;

use domain_ledger::{InMemoryTransactionStore, TransactionStore};
use test_utils::contract::run_store_contract;

#[tokio::test]
async fn in_memory_store_satisfies_contract() {
    run_store_contract(|| async {
        Arc::new(InMemoryTransactionStore::new()) as Arc<dyn TransactionStore>
    })
    .await;
}
