//! Conversion of VCSN API replies into typed values.

use crate::types::date_bound::DateBound;
use crate::types::time_series::{DateRange, TimeSeriesFrame, TimeSeriesRecord};
use crate::weather_data::error::ReplyFormatError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct DataPoint {
    #[serde(rename = "validityTime")]
    validity_time: String,
    value: Option<f64>,
}

/// Reads `startDate` / `endDate` from a span reply. Date-only values mean midnight.
pub fn parse_span(reply: &Value) -> Result<DateRange, ReplyFormatError> {
    let start = date_field(reply, "startDate")?
        .earliest()
        .ok_or_else(|| invalid_date(reply, "startDate"))?;
    let end = date_field(reply, "endDate")?
        .earliest()
        .ok_or_else(|| invalid_date(reply, "endDate"))?;
    Ok(DateRange { start, end })
}

fn date_field(reply: &Value, field: &'static str) -> Result<DateBound, ReplyFormatError> {
    match reply.get(field) {
        Some(Value::String(text)) => Ok(DateBound::from(text.as_str())),
        Some(Value::Null) | None => Err(ReplyFormatError::MissingField(field)),
        Some(_) => Err(invalid_date(reply, field)),
    }
}

fn invalid_date(reply: &Value, field: &'static str) -> ReplyFormatError {
    ReplyFormatError::InvalidDate {
        field,
        value: reply.get(field).map(|v| v.to_string()).unwrap_or_default(),
    }
}

/// Converts the `data` array of a data reply into records, in reply order.
pub fn parse_records(reply: &Value) -> Result<Vec<TimeSeriesRecord>, ReplyFormatError> {
    let data = match reply.get("data") {
        Some(Value::Array(data)) => data,
        _ => return Err(ReplyFormatError::MissingField("data")),
    };

    data.iter()
        .enumerate()
        .map(|(index, item)| {
            let point = DataPoint::deserialize(item)
                .map_err(|source| ReplyFormatError::MalformedRecord { index, source })?;
            let timestamp = DateBound::from(point.validity_time.as_str())
                .earliest()
                .ok_or(ReplyFormatError::InvalidTimestamp {
                    index,
                    value: point.validity_time.clone(),
                })?;
            Ok(TimeSeriesRecord {
                timestamp,
                value: point.value,
            })
        })
        .collect()
}

/// Converts a data reply into a frame whose value column is `measurement_name`.
pub fn reply_to_frame(
    reply: &Value,
    measurement_name: &str,
) -> Result<TimeSeriesFrame, ReplyFormatError> {
    let records = parse_records(reply)?;
    Ok(TimeSeriesFrame::from_records(measurement_name, &records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn span_reply_with_metadata() {
        let reply = json!({
            "productClass": "VCSN",
            "featureId": 31001,
            "startDate": "1972-01-01T09:00:00Z",
            "endDate": "2024-05-01T09:00:00Z",
            "productId": 1
        });
        let span = parse_span(&reply).unwrap();
        assert_eq!(span.start, Utc.with_ymd_and_hms(1972, 1, 1, 9, 0, 0).unwrap());
        assert_eq!(span.end, Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn date_only_span_end_is_midnight() {
        let span = parse_span(&json!({"startDate": "1972-01-01", "endDate": "2024-05-01"})).unwrap();
        assert_eq!(span.start, Utc.with_ymd_and_hms(1972, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(span.end, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn span_reply_without_dates_fails() {
        assert!(matches!(
            parse_span(&json!({"endDate": "2024-05-01"})),
            Err(ReplyFormatError::MissingField("startDate"))
        ));
        assert!(matches!(
            parse_span(&json!({"startDate": 5, "endDate": "2024-05-01"})),
            Err(ReplyFormatError::InvalidDate { field: "startDate", .. })
        ));
        assert!(matches!(
            parse_span(&json!({"startDate": "2000-01-01", "endDate": "soon"})),
            Err(ReplyFormatError::InvalidDate { field: "endDate", .. })
        ));
    }

    #[test]
    fn data_reply_becomes_named_frame() {
        let reply = json!({
            "data": [
                {"validityTime": "2020-01-01T00:00:00Z", "value": 5.2},
                {"validityTime": "2020-01-02T00:00:00Z", "value": null}
            ],
            "productId": 1
        });
        let frame = reply_to_frame(&reply, "rain").unwrap();
        assert_eq!(frame.frame.get_column_names_str(), ["timestamp", "rain"]);
        let records = frame.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value, Some(5.2));
        assert_eq!(records[1].value, None);
    }

    #[test]
    fn integer_values_are_read_as_floats() {
        let reply = json!({"data": [{"validityTime": "2020-01-01T00:00:00Z", "value": 3}]});
        let records = parse_records(&reply).unwrap();
        assert_eq!(records[0].value, Some(3.0));
    }

    #[test]
    fn missing_or_malformed_data_is_an_error() {
        assert!(matches!(
            parse_records(&json!({"startDate": "2000-01-01"})),
            Err(ReplyFormatError::MissingField("data"))
        ));
        assert!(matches!(
            parse_records(&Value::Null),
            Err(ReplyFormatError::MissingField("data"))
        ));
        assert!(matches!(
            parse_records(&json!({"data": [{"value": 1.0}]})),
            Err(ReplyFormatError::MalformedRecord { index: 0, .. })
        ));
        assert!(matches!(
            parse_records(&json!({"data": [
                {"validityTime": "2020-01-01T00:00:00Z", "value": 1.0},
                {"validityTime": "not a time", "value": 2.0}
            ]})),
            Err(ReplyFormatError::InvalidTimestamp { index: 1, .. })
        ));
    }

    #[test]
    fn empty_data_array_is_an_empty_frame() {
        let frame = reply_to_frame(&json!({"data": []}), "tmax").unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.value_column(), "tmax");
    }
}
