//! Transaction entity
//!
//! A transaction is immutable once created: it is written once, read many
//! times and deleted at most once. There is no update operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Cents, TransactionId};

use crate::error::LedgerError;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received
    Income,
    /// Money spent
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(LedgerError::bad_request(format!(
                "invalid transaction type '{}', expected 'income' or 'expense'",
                other
            ))),
        }
    }
}

/// A recorded income or expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    /// Always strictly positive
    pub amount_cents: Cents,
    /// Business date of the transaction
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Total order used by every listing: occurrence, then creation, then id
    pub fn listing_key(&self) -> (DateTime<Utc>, DateTime<Utc>, TransactionId) {
        (self.occurred_at, self.created_at, self.id)
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

/// Caller input for recording a transaction
///
/// Identity and timestamps are assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTransaction {
    pub transaction_type: TransactionType,
    pub category: String,
    pub amount_cents: i64,
    pub description: Option<String>,
}

impl CreateTransaction {
    pub fn income(category: impl Into<String>, amount_cents: i64) -> Self {
        Self {
            transaction_type: TransactionType::Income,
            category: category.into(),
            amount_cents,
            description: None,
        }
    }

    pub fn expense(category: impl Into<String>, amount_cents: i64) -> Self {
        Self {
            transaction_type: TransactionType::Expense,
            category: category.into(),
            amount_cents,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
