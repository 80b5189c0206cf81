//! Custom Test Assertions
//!
//! Assertion helpers that print the whole value on failure.

use domain_ledger::{MonthlySummary, Transaction};

/// Asserts income, expense, net and count of a summary
pub fn assert_summary_totals(summary: &MonthlySummary, income: i64, expense: i64, count: u64) {
    assert_eq!(summary.income.value(), income, "income mismatch in {:?}", summary);
    assert_eq!(summary.expense.value(), expense, "expense mismatch in {:?}", summary);
    assert_eq!(
        summary.net.value(),
        income - expense,
        "net mismatch in {:?}",
        summary
    );
    assert_eq!(summary.count_tx, count, "count mismatch in {:?}", summary);
}

/// Asserts a summary has zero totals and no first/last dates
pub fn assert_empty_summary(summary: &MonthlySummary) {
    assert_summary_totals(summary, 0, 0, 0);
    assert!(summary.first_tx.is_none(), "unexpected first_tx in {:?}", summary);
    assert!(summary.last_tx.is_none(), "unexpected last_tx in {:?}", summary);
}

/// Asserts a listing is ascending by occurrence, then creation, then id
pub fn assert_listing_ordered(transactions: &[Transaction]) {
    for pair in transactions.windows(2) {
        assert!(
            pair[0].listing_key() <= pair[1].listing_key(),
            "listing out of order: {} ({}) before {} ({})",
            pair[0].id,
            pair[0].occurred_at,
            pair[1].id,
            pair[1].occurred_at
        );
    }
}

/// Asserts two listings hold the same ids in the same order
pub fn assert_same_ids(actual: &[Transaction], expected: &[&Transaction]) {
    let actual_ids: Vec<_> = actual.iter().map(|t| t.id).collect();
    let expected_ids: Vec<_> = expected.iter().map(|t| t.id).collect();
    assert_eq!(actual_ids, expected_ids);
}
