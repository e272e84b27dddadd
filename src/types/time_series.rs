//! Tabular results of a data fetch.

use chrono::{DateTime, Utc};
use polars::prelude::*;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Name of the timestamp column in every [`TimeSeriesFrame`].
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// A single observation: when it is valid and its value.
///
/// `value` is `None` when the provider reported a null for that time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesRecord {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Inclusive UTC date range, e.g. the span of data a station holds for a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            format_request_time(self.start),
            format_request_time(self.end)
        )
    }
}

/// Formats an instant the way the VCSN API expects it in query strings.
pub fn format_request_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// A fetched time series as a Polars [`DataFrame`].
///
/// The frame has two columns: [`TIMESTAMP_COLUMN`] (`Datetime[ms]`, UTC) and a
/// `Float64` column named after the measurement, e.g. `rain`.
///
/// # Examples
///
/// ```
/// use vcsn::{TimeSeriesFrame, TimeSeriesRecord};
/// use chrono::{TimeZone, Utc};
///
/// let records = vec![TimeSeriesRecord {
///     timestamp: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
///     value: Some(5.2),
/// }];
/// let frame = TimeSeriesFrame::from_records("rain", &records).unwrap();
/// assert_eq!(frame.frame.get_column_names_str(), ["timestamp", "rain"]);
/// assert_eq!(frame.records().unwrap(), records);
/// ```
#[derive(Debug, Clone)]
pub struct TimeSeriesFrame {
    /// The underlying Polars DataFrame.
    pub frame: DataFrame,
    value_column: String,
}

impl TimeSeriesFrame {
    /// Builds a frame from records, naming the value column `value_column`.
    pub fn from_records(
        value_column: &str,
        records: &[TimeSeriesRecord],
    ) -> Result<Self, PolarsError> {
        let millis: Vec<i64> = records
            .iter()
            .map(|r| r.timestamp.timestamp_millis())
            .collect();
        let values: Vec<Option<f64>> = records.iter().map(|r| r.value).collect();

        let timestamps = Int64Chunked::from_vec(TIMESTAMP_COLUMN.into(), millis)
            .into_datetime(TimeUnit::Milliseconds, None)
            .into_column();
        let values = Column::new(value_column.into(), values);

        Ok(Self {
            frame: DataFrame::new(vec![timestamps, values])?,
            value_column: value_column.to_string(),
        })
    }

    /// Name of the value column, which is the measurement name.
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Collects the frame back into records, in row order.
    pub fn records(&self) -> Result<Vec<TimeSeriesRecord>, PolarsError> {
        let timestamps = self
            .frame
            .column(TIMESTAMP_COLUMN)?
            .cast(&DataType::Int64)?;
        let values = self
            .frame
            .column(&self.value_column)?
            .cast(&DataType::Float64)?;

        let mut records = Vec::with_capacity(self.frame.height());
        for (millis, value) in timestamps.i64()?.into_iter().zip(values.f64()?.into_iter()) {
            let timestamp = millis
                .and_then(DateTime::from_timestamp_millis)
                .ok_or_else(|| {
                    PolarsError::ComputeError("null or out of range timestamp".into())
                })?;
            records.push(TimeSeriesRecord { timestamp, value });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn request_time_format_is_second_precision_utc() {
        let at = Utc.with_ymd_and_hms(2020, 3, 4, 5, 6, 7).unwrap()
            + chrono::Duration::milliseconds(890);
        assert_eq!(format_request_time(at), "2020-03-04T05:06:07Z");
    }

    #[test]
    fn frame_keeps_nulls() {
        let records = vec![
            TimeSeriesRecord {
                timestamp: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
                value: Some(1.5),
            },
            TimeSeriesRecord {
                timestamp: Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap(),
                value: None,
            },
        ];
        let frame = TimeSeriesFrame::from_records("tmax", &records).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.value_column(), "tmax");
        assert_eq!(frame.frame.column("tmax").unwrap().null_count(), 1);
        assert_eq!(frame.records().unwrap(), records);
    }

    #[test]
    fn empty_frame_has_both_columns() {
        let frame = TimeSeriesFrame::from_records("rain", &[]).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.frame.width(), 2);
    }
}
