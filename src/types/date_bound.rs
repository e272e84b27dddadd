//! Caller-facing representation of the start or end of a requested time range.
//!
//! A [`DateBound`] may be an exact instant, a day, a month, a year, or a string.
//! Days and date-only strings mean midnight of that day, whichever side of the
//! range they are on. Months and years cover an inclusive span: used as a start
//! they resolve to its first instant, used as an end to its last.

use crate::types::calendar::{days_in_month, Month, StartEndDateTime, Year};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};

/// One side of a date range passed to [`crate::Vcsn::fetch_data`].
///
/// # Examples
///
/// ```
/// use vcsn::{DateBound, Year};
/// use chrono::{TimeZone, Utc};
///
/// let day = DateBound::from("2020-01-31");
/// let midnight = Utc.with_ymd_and_hms(2020, 1, 31, 0, 0, 0).unwrap();
/// assert_eq!(day.earliest(), Some(midnight));
/// assert_eq!(day.latest(), Some(midnight));
///
/// let last = DateBound::from(Year(2020)).latest().unwrap();
/// assert_eq!(last.format("%Y-%m-%dT%H:%M:%S").to_string(), "2020-12-31T23:59:59");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DateBound {
    At(DateTime<Utc>),
    Day(NaiveDate),
    Month(Month),
    Year(Year),
    Text(String),
}

impl DateBound {
    /// The inclusive span this bound covers, or `None` if it cannot be resolved
    /// (an unparseable string or an impossible calendar value).
    pub fn span(&self) -> Option<StartEndDateTime> {
        match self {
            DateBound::At(at) => Some(StartEndDateTime::instant(*at)),
            DateBound::Day(day) => midnight(*day),
            DateBound::Month(month) => {
                let first = NaiveDate::from_ymd_opt(month.year(), month.month(), 1)?;
                let last = NaiveDate::from_ymd_opt(
                    month.year(),
                    month.month(),
                    days_in_month(month.year(), month.month())?,
                )?;
                StartEndDateTime::days(first, last)
            }
            DateBound::Year(year) => StartEndDateTime::days(
                NaiveDate::from_ymd_opt(year.get(), 1, 1)?,
                NaiveDate::from_ymd_opt(year.get(), 12, 31)?,
            ),
            DateBound::Text(text) => parse_text(text.trim()),
        }
    }

    /// First instant covered, used when this bound starts a range.
    pub fn earliest(&self) -> Option<DateTime<Utc>> {
        self.span().map(|span| span.start)
    }

    /// Last instant covered, used when this bound ends a range.
    pub fn latest(&self) -> Option<DateTime<Utc>> {
        self.span().map(|span| span.end)
    }
}

fn parse_text(text: &str) -> Option<StartEndDateTime> {
    if let Ok(dt) = text.parse::<DateTime<Utc>>() {
        return Some(StartEndDateTime::instant(dt));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(StartEndDateTime::instant(dt.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(StartEndDateTime::instant(naive.and_utc()));
        }
    }
    midnight(NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?)
}

fn midnight(day: NaiveDate) -> Option<StartEndDateTime> {
    Some(StartEndDateTime::instant(day.and_hms_opt(0, 0, 0)?.and_utc()))
}

impl From<DateTime<Utc>> for DateBound {
    fn from(value: DateTime<Utc>) -> Self {
        DateBound::At(value)
    }
}

impl From<DateTime<FixedOffset>> for DateBound {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DateBound::At(value.with_timezone(&Utc))
    }
}

impl From<DateTime<Local>> for DateBound {
    fn from(value: DateTime<Local>) -> Self {
        DateBound::At(value.with_timezone(&Utc))
    }
}

// Naive datetimes are taken to be UTC.
impl From<NaiveDateTime> for DateBound {
    fn from(value: NaiveDateTime) -> Self {
        DateBound::At(value.and_utc())
    }
}

impl From<NaiveDate> for DateBound {
    fn from(value: NaiveDate) -> Self {
        DateBound::Day(value)
    }
}

impl From<Month> for DateBound {
    fn from(value: Month) -> Self {
        DateBound::Month(value)
    }
}

impl From<Year> for DateBound {
    fn from(value: Year) -> Self {
        DateBound::Year(value)
    }
}

impl From<&str> for DateBound {
    fn from(value: &str) -> Self {
        DateBound::Text(value.to_string())
    }
}

impl From<String> for DateBound {
    fn from(value: String) -> Self {
        DateBound::Text(value)
    }
}
