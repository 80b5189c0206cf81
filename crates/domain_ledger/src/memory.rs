//! In-memory port implementations
//!
//! `InMemoryTransactionStore` is the default backend: one reader/writer lock
//! around the whole map. Writers are exclusive, readers run concurrently,
//! and nothing awaits while a guard is held except the lock itself.
//! `InMemoryBlobStore` keeps uploaded objects for inspection.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, MonthPeriod, PortError, TransactionId,
};

use crate::ports::{BlobStore, TransactionStore};
use crate::summary::{MonthlySummary, SummaryAccumulator};
use crate::transaction::Transaction;

/// Process-local transaction store
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<TransactionId, Transaction>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the store, e.g. for tests
    pub async fn with_transactions(transactions: impl IntoIterator<Item = Transaction>) -> Self {
        let store = Self::new();
        {
            let mut map = store.transactions.write().await;
            for transaction in transactions {
                map.insert(transaction.id, transaction);
            }
        }
        store
    }

    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.transactions.read().await.is_empty()
    }
}

impl DomainPort for InMemoryTransactionStore {}

#[async_trait]
impl HealthCheckable for InMemoryTransactionStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("memory-transaction-store")
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn create(&self, transaction: &Transaction) -> Result<(), PortError> {
        let mut map = self.transactions.write().await;
        if map.contains_key(&transaction.id) {
            return Err(PortError::conflict(format!(
                "transaction {} already exists",
                transaction.id
            )));
        }
        map.insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn list_by_period(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, PortError> {
        let mut matched: Vec<Transaction> = {
            let map = self.transactions.read().await;
            map.values()
                .filter(|tx| tx.occurred_at >= from && tx.occurred_at <= to)
                .cloned()
                .collect()
        };
        matched.sort_by_key(Transaction::listing_key);
        Ok(matched)
    }

    async fn delete(&self, id: TransactionId) -> Result<(), PortError> {
        self.transactions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| PortError::not_found("Transaction", id))
    }

    async fn monthly_summary(&self, period: MonthPeriod) -> Result<MonthlySummary, PortError> {
        let map = self.transactions.read().await;
        let mut acc = SummaryAccumulator::new(period);
        for transaction in map.values() {
            acc.add(transaction);
        }
        Ok(acc.finish())
    }
}

/// An object written to `InMemoryBlobStore`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

impl StoredObject {
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Blob store that keeps objects in a map keyed by (bucket, key)
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    objects: Arc<RwLock<HashMap<(String, String), StoredObject>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

impl DomainPort for InMemoryBlobStore {}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PortError> {
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionType;
    use chrono::{Duration, TimeZone};
    use core_kernel::Cents;

    fn tx_at(at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            transaction_type: TransactionType::Income,
            category: "salary".to_string(),
            amount_cents: Cents::new(1000),
            occurred_at: at,
            description: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_create_stores_independent_copy() {
        let store = InMemoryTransactionStore::new();
        let at = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let mut tx = tx_at(at);
        store.create(&tx).await.unwrap();

        tx.category = "changed".to_string();

        let listed = store.list_by_period(at, at).await.unwrap();
        assert_eq!(listed[0].category, "salary");
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = InMemoryTransactionStore::new();
        let tx = tx_at(Utc::now());
        store.create(&tx).await.unwrap();

        let err = store.create(&tx).await.unwrap_err();
        assert!(matches!(err, PortError::Conflict { .. }));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_bounds_are_inclusive_and_sorted() {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let txs: Vec<_> = [5, 0, 10, 3, 11]
            .iter()
            .map(|d| tx_at(base + Duration::days(*d)))
            .collect();
        let store = InMemoryTransactionStore::with_transactions(txs).await;

        let listed = store
            .list_by_period(base, base + Duration::days(10))
            .await
            .unwrap();

        let days: Vec<i64> = listed
            .iter()
            .map(|t| (t.occurred_at - base).num_days())
            .collect();
        assert_eq!(days, vec![0, 3, 5, 10]);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let store = InMemoryTransactionStore::new();
        let err = store.delete(TransactionId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_blob_store_records_objects() {
        let blobs = InMemoryBlobStore::new();
        blobs
            .put("bucket", "report-2025-11.txt", b"hello".to_vec(), "text/plain")
            .await
            .unwrap();

        let object = blobs.get("bucket", "report-2025-11.txt").await.unwrap();
        assert_eq!(object.text(), Some("hello"));
        assert_eq!(object.content_type, "text/plain");
        assert!(blobs.get("other", "report-2025-11.txt").await.is_none());
    }
}
