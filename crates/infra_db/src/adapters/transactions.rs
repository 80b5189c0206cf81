//! PostgreSQL Transaction Store
//!
//! Implements `TransactionStore` over the `TransactionRepository`. Row types
//! never leave this module; callers only see domain types and `PortError`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::PostgresTransactionStore;
//! use domain_ledger::TransactionStore;
//!
//! let store: Arc<dyn TransactionStore> = Arc::new(PostgresTransactionStore::new(pool));
//! let november = store.monthly_summary(MonthPeriod::new(2025, 11)?).await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, Cents, DomainPort, HealthCheckResult, HealthCheckable, MonthPeriod, PortError,
    TransactionId,
};
use domain_ledger::{MonthlySummary, Transaction, TransactionStore, TransactionType};

use crate::error::DatabaseError;
use crate::repositories::transactions::{
    MonthlyTotalsRow, TransactionRepository, TransactionRow, TransactionType as DbTransactionType,
};

const ADAPTER_ID: &str = "postgres-transaction-store";

/// PostgreSQL-backed `TransactionStore`
///
/// # Error Handling
///
/// - `DatabaseError::NotFound` -> `PortError::NotFound`
/// - `DatabaseError::DuplicateEntry` -> `PortError::Conflict`
/// - connection and pool errors -> `PortError::Connection`
/// - anything else -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresTransactionStore {
    repository: TransactionRepository,
    pool: PgPool,
}

impl PostgresTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: TransactionRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresTransactionStore {}

#[async_trait]
impl HealthCheckable for PostgresTransactionStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                latency_ms,
                ..HealthCheckResult::healthy(ADAPTER_ID)
            },
            Err(e) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl TransactionStore for PostgresTransactionStore {
    #[instrument(skip(self, transaction), fields(transaction_id = %transaction.id))]
    async fn create(&self, transaction: &Transaction) -> Result<(), PortError> {
        let row = transaction_to_row(transaction);
        self.repository.insert(&row).await.map_err(db_to_port_error)?;
        debug!("transaction inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_period(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Transaction>, PortError> {
        let rows = self
            .repository
            .list_between(from, to)
            .await
            .map_err(db_to_port_error)?;

        debug!(count = rows.len(), "transactions listed");
        Ok(rows.into_iter().map(row_to_transaction).collect())
    }

    #[instrument(skip(self), fields(transaction_id = %id))]
    async fn delete(&self, id: TransactionId) -> Result<(), PortError> {
        self.repository
            .delete(*id.as_uuid())
            .await
            .map_err(|e| match e {
                e if e.is_not_found() => PortError::not_found("Transaction", id),
                other => db_to_port_error(other),
            })
    }

    #[instrument(skip(self))]
    async fn monthly_summary(&self, period: MonthPeriod) -> Result<MonthlySummary, PortError> {
        let totals = self
            .repository
            .monthly_totals(period.start(), period.end_exclusive())
            .await
            .map_err(db_to_port_error)?;

        totals_to_summary(period, totals)
    }
}

fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound(msg) => PortError::NotFound {
            entity_type: "Transaction".to_string(),
            id: msg,
        },
        DatabaseError::DuplicateEntry(msg) => PortError::conflict(msg),
        // CHECK constraints mirror the domain rules on category and amount
        e if e.is_constraint_violation() => PortError::validation(e.to_string()),
        e if e.is_connection_error() => PortError::connection(e.to_string()),
        other => PortError::internal(other.to_string()),
    }
}

fn transaction_to_row(transaction: &Transaction) -> TransactionRow {
    TransactionRow {
        id: *transaction.id.as_uuid(),
        transaction_type: domain_to_db_type(transaction.transaction_type),
        category: transaction.category.clone(),
        amount_cents: transaction.amount_cents.value(),
        occurred_at: transaction.occurred_at,
        description: transaction.description.clone(),
        created_at: transaction.created_at,
        updated_at: transaction.updated_at,
    }
}

fn row_to_transaction(row: TransactionRow) -> Transaction {
    Transaction {
        id: TransactionId::from_uuid(row.id),
        transaction_type: db_to_domain_type(row.transaction_type),
        category: row.category,
        amount_cents: Cents::new(row.amount_cents),
        occurred_at: row.occurred_at,
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn totals_to_summary(period: MonthPeriod, row: MonthlyTotalsRow) -> Result<MonthlySummary, PortError> {
    let count = u64::try_from(row.count_transactions)
        .map_err(|_| PortError::internal(format!("negative count: {}", row.count_transactions)))?;

    Ok(MonthlySummary::from_totals(
        period,
        Cents::new(row.income_cents),
        Cents::new(row.expense_cents),
        count,
        row.first_transaction,
        row.last_transaction,
    ))
}

fn domain_to_db_type(t: TransactionType) -> DbTransactionType {
    match t {
        TransactionType::Income => DbTransactionType::Income,
        TransactionType::Expense => DbTransactionType::Expense,
    }
}

fn db_to_domain_type(t: DbTransactionType) -> TransactionType {
    match t {
        DbTransactionType::Income => TransactionType::Income,
        DbTransactionType::Expense => TransactionType::Expense,
    }
}
