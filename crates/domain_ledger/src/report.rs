//! Monthly report rendering
//!
//! Rendering is pure: the same summary and currency always produce the same
//! text.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Cents, Currency, MonthPeriod};

use crate::summary::MonthlySummary;

const RULE: &str = "========================================";
const DIVIDER: &str = "----------------------------------------";

/// Sign of the month's net balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    Positive,
    Negative,
    Neutral,
}

impl ReportStatus {
    pub fn from_net(net: Cents) -> Self {
        if net.is_positive() {
            ReportStatus::Positive
        } else if net.is_negative() {
            ReportStatus::Negative
        } else {
            ReportStatus::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Positive => "POSITIVE",
            ReportStatus::Negative => "NEGATIVE",
            ReportStatus::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct ReportView<'a> {
    summary: &'a MonthlySummary,
    currency: Currency,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;
        let month_name = MonthPeriod::new(s.year, s.month)
            .map(|p| p.month_name())
            .unwrap_or("Unknown");

        writeln!(f, "{}", RULE)?;
        writeln!(f, "MONTHLY FINANCIAL REPORT - {}/{}", month_name, s.year)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f)?;
        writeln!(f, "Period: {} {}", month_name, s.year)?;
        writeln!(f, "Total Transactions: {}", s.count_tx)?;
        writeln!(f)?;
        writeln!(f, "FINANCIAL SUMMARY:")?;
        writeln!(f, "{}", DIVIDER)?;
        writeln!(f, "Income:         {}", s.income.display_with(self.currency))?;
        writeln!(f, "Expenses:       {}", s.expense.display_with(self.currency))?;
        writeln!(f, "{}", DIVIDER)?;
        writeln!(f, "Net Balance:    {}", s.net.display_with(self.currency))?;
        writeln!(f, "{}", DIVIDER)?;
        writeln!(f)?;

        if let Some(first) = s.first_tx {
            writeln!(f, "First Transaction: {}", first.to_rfc3339_opts(SecondsFormat::Secs, true))?;
        }
        if let Some(last) = s.last_tx {
            writeln!(f, "Last Transaction:  {}", last.to_rfc3339_opts(SecondsFormat::Secs, true))?;
        }

        writeln!(f)?;
        writeln!(f, "Status: {}", ReportStatus::from_net(s.net))?;
        writeln!(f, "{}", RULE)
    }
}

/// Renders the plain-text report for one monthly summary
pub fn render_report(summary: &MonthlySummary, currency: Currency) -> String {
    ReportView { summary, currency }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn november(income: i64, expense: i64, count: u64) -> MonthlySummary {
        let period = MonthPeriod::new(2025, 11).unwrap();
        let first = Utc.with_ymd_and_hms(2025, 11, 3, 10, 0, 0).unwrap();
        let last = Utc.with_ymd_and_hms(2025, 11, 20, 18, 30, 0).unwrap();
        MonthlySummary::from_totals(
            period,
            Cents::new(income),
            Cents::new(expense),
            count,
            Some(first),
            Some(last),
        )
    }

    #[test]
    fn test_status_from_net() {
        assert_eq!(ReportStatus::from_net(Cents::new(1)), ReportStatus::Positive);
        assert_eq!(ReportStatus::from_net(Cents::new(-1)), ReportStatus::Negative);
        assert_eq!(ReportStatus::from_net(Cents::ZERO), ReportStatus::Neutral);
    }

    #[test]
    fn test_positive_report() {
        let text = render_report(&november(500000, 150000, 2), Currency::USD);

        assert!(text.starts_with(RULE));
        assert!(text.contains("MONTHLY FINANCIAL REPORT - November/2025"));
        assert!(text.contains("Total Transactions: 2"));
        assert!(text.contains("Income:         $ 5000.00"));
        assert!(text.contains("Expenses:       $ 1500.00"));
        assert!(text.contains("Net Balance:    $ 3500.00"));
        assert!(text.contains("First Transaction: 2025-11-03T10:00:00Z"));
        assert!(text.contains("Last Transaction:  2025-11-20T18:30:00Z"));
        assert!(text.contains("Status: POSITIVE"));
        assert!(text.ends_with(&format!("{}\n", RULE)));
    }

    #[test]
    fn test_negative_report_in_other_currency() {
        let text = render_report(&november(1000, 2505, 2), Currency::BRL);

        assert!(text.contains("Net Balance:    R$ -15.05"));
        assert!(text.contains("Status: NEGATIVE"));
    }

    #[test]
    fn test_empty_month_omits_dates() {
        let summary = MonthlySummary::empty(MonthPeriod::new(2025, 2).unwrap());
        let text = render_report(&summary, Currency::USD);

        assert!(text.contains("MONTHLY FINANCIAL REPORT - February/2025"));
        assert!(text.contains("Net Balance:    $ 0.00"));
        assert!(!text.contains("First Transaction"));
        assert!(!text.contains("Last Transaction"));
        assert!(text.contains("Status: NEUTRAL"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let summary = november(42, 7, 2);
        assert_eq!(
            render_report(&summary, Currency::EUR),
            render_report(&summary, Currency::EUR)
        );
    }
}
