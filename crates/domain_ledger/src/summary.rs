//! Monthly aggregation
//!
//! Summaries are derived on every request and never persisted. The engine is
//! stateless: it folds a snapshot of transactions handed to it by a store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Cents, MonthPeriod};

use crate::transaction::{Transaction, TransactionType};

/// Aggregate of one calendar month (UTC)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    #[serde(rename = "income_cents")]
    pub income: Cents,
    #[serde(rename = "expense_cents")]
    pub expense: Cents,
    /// income - expense
    #[serde(rename = "net_cents")]
    pub net: Cents,
    #[serde(rename = "count_transactions")]
    pub count_tx: u64,
    /// Earliest occurrence in the month, present only when count_tx > 0
    #[serde(default, skip_serializing_if = "Option::is_none", with = "rfc3339_seconds")]
    pub first_tx: Option<DateTime<Utc>>,
    /// Latest occurrence in the month, present only when count_tx > 0
    #[serde(default, skip_serializing_if = "Option::is_none", with = "rfc3339_seconds")]
    pub last_tx: Option<DateTime<Utc>>,
}

impl MonthlySummary {
    /// Zero totals and no dates
    pub fn empty(period: MonthPeriod) -> Self {
        Self {
            year: period.year(),
            month: period.month(),
            income: Cents::ZERO,
            expense: Cents::ZERO,
            net: Cents::ZERO,
            count_tx: 0,
            first_tx: None,
            last_tx: None,
        }
    }

    /// Builds a summary from totals computed elsewhere, e.g. by a SQL aggregate
    ///
    /// Dates are dropped when the count is zero.
    pub fn from_totals(
        period: MonthPeriod,
        income: Cents,
        expense: Cents,
        count_tx: u64,
        first_tx: Option<DateTime<Utc>>,
        last_tx: Option<DateTime<Utc>>,
    ) -> Self {
        let has_rows = count_tx > 0;
        Self {
            year: period.year(),
            month: period.month(),
            income,
            expense,
            net: income.saturating_sub(expense),
            count_tx,
            first_tx: first_tx.filter(|_| has_rows),
            last_tx: last_tx.filter(|_| has_rows),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count_tx == 0
    }
}

/// Incremental fold over the transactions of one month
///
/// Records outside the period are ignored, so a full-store scan can be fed
/// in directly.
#[derive(Debug, Clone)]
pub struct SummaryAccumulator {
    period: MonthPeriod,
    income: Cents,
    expense: Cents,
    count: u64,
    first: Option<DateTime<Utc>>,
    last: Option<DateTime<Utc>>,
}

impl SummaryAccumulator {
    pub fn new(period: MonthPeriod) -> Self {
        Self {
            period,
            income: Cents::ZERO,
            expense: Cents::ZERO,
            count: 0,
            first: None,
            last: None,
        }
    }

    pub fn add(&mut self, transaction: &Transaction) {
        if !self.period.contains(transaction.occurred_at) {
            return;
        }

        match transaction.transaction_type {
            TransactionType::Income => {
                self.income = self.income.saturating_add(transaction.amount_cents)
            }
            TransactionType::Expense => {
                self.expense = self.expense.saturating_add(transaction.amount_cents)
            }
        }

        self.count += 1;
        let at = transaction.occurred_at;
        self.first = Some(self.first.map_or(at, |first| first.min(at)));
        self.last = Some(self.last.map_or(at, |last| last.max(at)));
    }

    pub fn finish(self) -> MonthlySummary {
        MonthlySummary::from_totals(
            self.period,
            self.income,
            self.expense,
            self.count,
            self.first,
            self.last,
        )
    }
}

/// Computes the summary of `period` over any snapshot of transactions
pub fn summarize<'a, I>(period: MonthPeriod, transactions: I) -> MonthlySummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut acc = SummaryAccumulator::new(period);
    for transaction in transactions {
        acc.add(transaction);
    }
    acc.finish()
}

/// Optional instants rendered as RFC 3339 with second precision and a `Z` suffix
mod rfc3339_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}
