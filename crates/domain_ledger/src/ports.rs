//! Ledger Domain Ports
//!
//! Port interfaces the ledger needs from the outside world:
//!
//! - `TransactionStore`: persistence and aggregation of transactions, with an
//!   in-memory implementation here and a PostgreSQL one in `infra_db`
//! - `BlobStore`: write-only object storage for rendered reports
//!
//! # Usage
//!
//! ```rust,ignore
//! let store: Arc<dyn TransactionStore> = Arc::new(InMemoryTransactionStore::new());
//! store.create(&transaction).await?;
//! let november = store.monthly_summary(MonthPeriod::new(2025, 11)?).await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainPort, HealthCheckable, MonthPeriod, PortError, TransactionId};

use crate::summary::MonthlySummary;
use crate::transaction::Transaction;

/// Storage for transactions
///
/// Implementations never validate business input; the service does. All
/// operations are safe to call from many tasks at once.
#[async_trait]
pub trait TransactionStore: DomainPort + HealthCheckable {
    /// Persists a fully-formed transaction
    ///
    /// The store keeps its own copy; later changes to the caller's value are
    /// not observed.
    async fn create(&self, transaction: &Transaction) -> Result<(), PortError>;

    /// Returns every transaction with `from <= occurred_at <= to`
    ///
    /// Ordered ascending by occurrence, then creation, then id. An empty
    /// vector is returned when nothing matches.
    async fn list_by_period(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, PortError>;

    /// Removes a transaction
    ///
    /// # Errors
    ///
    /// `PortError::NotFound` if no transaction has this id
    async fn delete(&self, id: TransactionId) -> Result<(), PortError>;

    /// Aggregates one calendar month; an empty month yields zeros
    async fn monthly_summary(&self, period: MonthPeriod) -> Result<MonthlySummary, PortError>;
}

/// Object storage target for rendered reports
#[async_trait]
pub trait BlobStore: DomainPort {
    /// Writes `body` under `bucket`/`key`, replacing any previous object
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PortError>;
}
