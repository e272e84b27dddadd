use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A whole calendar year, e.g. `Year(2020)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);

impl Year {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A calendar month as `(year, month)`, e.g. `Month::new(2, 2020)` for February 2020.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

/// Inclusive UTC instant range covered by a calendar value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StartEndDateTime {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl StartEndDateTime {
    pub(crate) fn instant(at: DateTime<Utc>) -> Self {
        Self { start: at, end: at }
    }

    pub(crate) fn days(first: NaiveDate, last: NaiveDate) -> Option<Self> {
        let start = first.and_hms_opt(0, 0, 0)?.and_utc();
        let end = last.and_hms_micro_opt(23, 59, 59, 999_999)?.and_utc();
        Some(Self { start, end })
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}
