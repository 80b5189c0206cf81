//! Test Data Builders
//!
//! Builds fully-formed transactions, bypassing the service, for seeding
//! stores directly. Only the relevant fields need to be set.

use chrono::{DateTime, Utc};
use core_kernel::{Cents, TransactionId};
use domain_ledger::{Transaction, TransactionType};

use crate::fixtures::TemporalFixtures;

/// Builder for `Transaction` values
#[derive(Debug, Clone)]
pub struct TestTransactionBuilder {
    id: TransactionId,
    transaction_type: TransactionType,
    category: String,
    amount_cents: i64,
    occurred_at: DateTime<Utc>,
    created_at: Option<DateTime<Utc>>,
    description: Option<String>,
}

impl Default for TestTransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTransactionBuilder {
    /// An income of 100 cents in category "misc" on the fixture payday
    pub fn new() -> Self {
        Self {
            id: TransactionId::new(),
            transaction_type: TransactionType::Income,
            category: "misc".to_string(),
            amount_cents: 100,
            occurred_at: TemporalFixtures::payday(),
            created_at: None,
            description: None,
        }
    }

    pub fn income(amount_cents: i64) -> Self {
        Self::new().with_type(TransactionType::Income).with_amount(amount_cents)
    }

    pub fn expense(amount_cents: i64) -> Self {
        Self::new().with_type(TransactionType::Expense).with_amount(amount_cents)
    }

    pub fn with_id(mut self, id: TransactionId) -> Self {
        self.id = id;
        self
    }

    pub fn with_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_amount(mut self, amount_cents: i64) -> Self {
        self.amount_cents = amount_cents;
        self
    }

    /// Sets the occurrence instant; creation defaults to the same instant
    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> Transaction {
        let created_at = self.created_at.unwrap_or(self.occurred_at);
        Transaction {
            id: self.id,
            transaction_type: self.transaction_type,
            category: self.category,
            amount_cents: Cents::new(self.amount_cents),
            occurred_at: self.occurred_at,
            description: self.description,
            created_at,
            updated_at: created_at,
        }
    }
}
