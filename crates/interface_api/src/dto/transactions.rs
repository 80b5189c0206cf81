//! Transaction DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_ledger::{Transaction, TransactionType};

/// Body of `POST /api/v1/transactions`
///
/// `type` stays a string here so an unknown value is reported as a bad
/// request by the ledger rather than as a JSON decoding failure.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub category: String,
    pub amount_cents: i64,
    pub description: Option<String>,
}

/// Query of `GET /api/v1/transactions`
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// First day, inclusive
    pub from: NaiveDate,
    /// Last day, inclusive through its final instant
    pub to: NaiveDate,
    /// IANA zone the days are interpreted in, UTC when absent
    pub tz: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount_cents: i64,
    pub occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id.into(),
            transaction_type: tx.transaction_type,
            category: tx.category,
            amount_cents: tx.amount_cents.value(),
            occurred_at: tx.occurred_at,
            description: tx.description,
            created_at: tx.created_at,
            updated_at: tx.updated_at,
        }
    }
}
