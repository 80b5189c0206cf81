//! Calendar and time zone handling
//!
//! Every instant stored by the ledger is UTC. This module converts between
//! calendar inputs (dates, months, zone names) and UTC instants:
//! - `Timezone`: IANA zone with day-boundary helpers
//! - `DateRange`: inclusive date range resolved to UTC bounds
//! - `MonthPeriod`: validated calendar month with half-open UTC bounds
//! - `Clock`: injectable source of "now"

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Year {0} is out of the supported range")]
    InvalidYear(i32),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Local time {0} does not exist in timezone {1}")]
    NonexistentLocalTime(String, String),
}

/// Timezone wrapper used to interpret calendar dates supplied by callers
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s.trim())
            .map(Timezone)
            .map_err(|_| TemporalError::InvalidTimezone(s.to_string()))
    }
}

impl Timezone {
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Gets the first instant of the given local day as UTC
    ///
    /// When midnight falls in a DST gap the day starts at the first valid
    /// instant after it. Fails only when the zone skipped the whole day.
    pub fn start_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>, TemporalError> {
        let midnight = date.and_time(NaiveTime::MIN);
        match self.resolve(midnight, true) {
            Err(err) => self.first_valid_after(midnight).ok_or(err),
            resolved => resolved,
        }
    }

    /// Gets the last instant of the given local day as UTC
    ///
    /// One nanosecond before the next local day starts, so a DST fold late in
    /// the day resolves to its second pass.
    pub fn end_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>, TemporalError> {
        if let Some(next_start) = date.succ_opt().and_then(|next| self.start_of_day(next).ok()) {
            return Ok(next_start - Duration::nanoseconds(1));
        }
        let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN);
        self.resolve(date.and_time(last), false)
    }

    // Ambiguous wall-clock times (DST fold) resolve to the widest bound.
    fn resolve(&self, local: NaiveDateTime, earliest: bool) -> Result<DateTime<Utc>, TemporalError> {
        match self.0.from_local_datetime(&local) {
            LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
            LocalResult::Ambiguous(first, second) => {
                let dt = if earliest { first } else { second };
                Ok(dt.with_timezone(&Utc))
            }
            LocalResult::None => Err(TemporalError::NonexistentLocalTime(
                local.to_string(),
                self.0.name().to_string(),
            )),
        }
    }

    // First existing instant after `local`, which lies in a gap, on the same
    // local day. Offsets are whole seconds, so a minute scan followed by a
    // second scan of the minute the gap ends in is exact.
    fn first_valid_after(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        let earliest = |t: NaiveDateTime| self.0.from_local_datetime(&t).earliest();
        let day = local.date();

        let minute = (1..=24 * 60)
            .map(|m| local + Duration::minutes(m))
            .take_while(|t| t.date() == day)
            .find(|t| earliest(*t).is_some())?;

        (1..60)
            .rev()
            .map(|s| minute - Duration::seconds(s))
            .chain(std::iter::once(minute))
            .filter(|t| *t > local)
            .find_map(earliest)
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name())
    }
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Resolves to inclusive UTC bounds: start of the first day through the
    /// last instant of the final day, both in `tz`
    pub fn to_utc_bounds(&self, tz: &Timezone) -> Result<(DateTime<Utc>, DateTime<Utc>), TemporalError> {
        Ok((tz.start_of_day(self.start)?, tz.end_of_day(self.end)?))
    }
}

/// A validated calendar month in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthPeriod {
    year: i32,
    month: u32,
}

impl MonthPeriod {
    /// Creates a period, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self, TemporalError> {
        if !(1..=12).contains(&month) {
            return Err(TemporalError::InvalidMonth(month));
        }
        let period = Self { year, month };
        // Both bounds must be representable
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() || period.next_first_day().is_none() {
            return Err(TemporalError::InvalidYear(year));
        }
        Ok(period)
    }

    /// The month containing the given instant
    pub fn containing(instant: DateTime<Utc>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// English month name
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// First instant of the month
    pub fn start(&self) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// First instant of the following month
    pub fn end_exclusive(&self) -> DateTime<Utc> {
        self.next_first_day()
            .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant.year() == self.year && instant.month() == self.month
    }

    /// Object key under which the month's report is stored
    pub fn report_key(&self) -> String {
        format!("report-{:04}-{:02}.txt", self.year, self.month)
    }

    fn next_first_day(&self) -> Option<NaiveDate> {
        if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year.checked_add(1)?, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        }
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Source of the current instant
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
