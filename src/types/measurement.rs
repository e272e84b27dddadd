use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A measurement (NIWA "product") from the measurement table, e.g. rainfall.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeasurementType {
    /// Human readable key (`propName` column). Also used as the value column name
    /// of fetched frames.
    pub name: String,
    /// Provider product id (`PRODUCTID` column).
    pub code: i64,
}

/// How a measurement is named when fetching data.
///
/// Both variants are checked against the measurement table before any request is
/// made.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MeasurementRef {
    ByName(String),
    ByCode(i64),
}

impl Display for MeasurementRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementRef::ByName(name) => write!(f, "{}", name),
            MeasurementRef::ByCode(code) => write!(f, "{}", code),
        }
    }
}

impl From<&str> for MeasurementRef {
    fn from(value: &str) -> Self {
        MeasurementRef::ByName(value.to_string())
    }
}

impl From<String> for MeasurementRef {
    fn from(value: String) -> Self {
        MeasurementRef::ByName(value)
    }
}

impl From<i64> for MeasurementRef {
    fn from(value: i64) -> Self {
        MeasurementRef::ByCode(value)
    }
}

impl From<&MeasurementType> for MeasurementRef {
    fn from(value: &MeasurementType) -> Self {
        MeasurementRef::ByCode(value.code)
    }
}
