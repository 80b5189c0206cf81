//! Property-Based Test Generators
//!
//! Proptest strategies that only produce transactions satisfying the
//! entity invariants (positive amount, non-empty category).

use chrono::{DateTime, Duration, Utc};
use core_kernel::MonthPeriod;
use proptest::prelude::*;

use domain_ledger::{Transaction, TransactionType};

use crate::builders::TestTransactionBuilder;

pub fn transaction_type_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![Just(TransactionType::Income), Just(TransactionType::Expense)]
}

/// Positive amounts in cents, small enough that thousands never overflow
pub fn positive_amount_strategy() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

pub fn category_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("salary".to_string()),
        Just("rent".to_string()),
        Just("food".to_string()),
        "[a-z]{1,12}",
    ]
}

/// Instants anywhere in the month, including its very first second
pub fn instant_in_month_strategy(period: MonthPeriod) -> impl Strategy<Value = DateTime<Utc>> {
    let span = (period.end_exclusive() - period.start()).num_seconds();
    (0..span).prop_map(move |offset| period.start() + Duration::seconds(offset))
}

/// Instants from one month before `period` to one month after it
pub fn instant_around_month_strategy(period: MonthPeriod) -> impl Strategy<Value = DateTime<Utc>> {
    let start = period.start() - Duration::days(31);
    let span = (period.end_exclusive() + Duration::days(31) - start).num_seconds();
    (0..span).prop_map(move |offset| start + Duration::seconds(offset))
}

/// Transactions spread around `period`, some inside and some outside it
pub fn transaction_strategy(period: MonthPeriod) -> impl Strategy<Value = Transaction> {
    (
        transaction_type_strategy(),
        positive_amount_strategy(),
        category_strategy(),
        instant_around_month_strategy(period),
    )
        .prop_map(|(kind, amount, category, at)| {
            TestTransactionBuilder::new()
                .with_type(kind)
                .with_amount(amount)
                .with_category(category)
                .at(at)
                .build()
        })
}
