//! Transaction repository
//!
//! SQL access for the `transactions` table. Instants are stored as
//! `TIMESTAMPTZ` and always read back in UTC.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::DatabaseError;

/// Database enum for transaction_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

/// One row of the `transactions` table
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount_cents: i64,
    pub occurred_at: DateTime<Utc>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregates over one half-open time range
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyTotalsRow {
    pub income_cents: i64,
    pub expense_cents: i64,
    pub count_transactions: i64,
    pub first_transaction: Option<DateTime<Utc>>,
    pub last_transaction: Option<DateTime<Utc>>,
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, type, category, amount_cents, occurred_at, description, created_at, updated_at
    FROM transactions
"#;

/// Repository for the transactions table
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts one row
    ///
    /// # Errors
    ///
    /// `DatabaseError::DuplicateEntry` if the id already exists
    pub async fn insert(&self, row: &TransactionRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, type, category, amount_cents, occurred_at,
                description, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(row.id)
        .bind(row.transaction_type)
        .bind(&row.category)
        .bind(row.amount_cents)
        .bind(row.occurred_at)
        .bind(&row.description)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        Ok(())
    }

    /// Rows with `from <= occurred_at <= to`, oldest first
    pub async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TransactionRow>, DatabaseError> {
        let query = format!(
            "{} WHERE occurred_at >= $1 AND occurred_at <= $2 ORDER BY occurred_at, created_at, id",
            SELECT_COLUMNS
        );

        sqlx::query_as::<_, TransactionRow>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))
    }

    /// Deletes one row
    ///
    /// # Errors
    ///
    /// `DatabaseError::NotFound` if no row has this id
    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Transaction", id));
        }
        Ok(())
    }

    /// Totals for `start <= occurred_at < end`
    ///
    /// Sums are computed in NUMERIC and cast to BIGINT, so a month whose
    /// total does not fit in 64 bits fails with `QueryFailed`.
    pub async fn monthly_totals(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<MonthlyTotalsRow, DatabaseError> {
        sqlx::query_as::<_, MonthlyTotalsRow>(
            r#"
            SELECT
                COALESCE(SUM(amount_cents) FILTER (WHERE type = 'income'), 0)::BIGINT AS income_cents,
                COALESCE(SUM(amount_cents) FILTER (WHERE type = 'expense'), 0)::BIGINT AS expense_cents,
                COUNT(*) AS count_transactions,
                MIN(occurred_at) AS first_transaction,
                MAX(occurred_at) AS last_transaction
            FROM transactions
            WHERE occurred_at >= $1 AND occurred_at < $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))
    }
}
