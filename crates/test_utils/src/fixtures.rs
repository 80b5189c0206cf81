//! Pre-built Test Fixtures
//!
//! Fixed instants so tests never depend on the wall clock.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::MonthPeriod;

/// Fixture instants and periods around November 2025
pub struct TemporalFixtures;

impl TemporalFixtures {
    pub fn november_2025() -> MonthPeriod {
        MonthPeriod::new(2025, 11).unwrap()
    }

    pub fn october_2025() -> MonthPeriod {
        MonthPeriod::new(2025, 10).unwrap()
    }

    /// 2025-11-03T10:00:00Z
    pub fn payday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 3, 10, 0, 0).unwrap()
    }

    /// 2025-11-05T09:30:00Z
    pub fn rent_day() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 5, 9, 30, 0).unwrap()
    }

    /// First instant of November 2025
    pub fn november_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap()
    }

    /// First instant of December 2025, outside November
    pub fn december_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap()
    }
}

/// Amounts used by the canonical two-transaction month
pub struct AmountFixtures;

impl AmountFixtures {
    pub const SALARY_CENTS: i64 = 500_000;
    pub const RENT_CENTS: i64 = 150_000;
    pub const NET_CENTS: i64 = Self::SALARY_CENTS - Self::RENT_CENTS;
}
