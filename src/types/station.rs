//! Station (agent) types: entries of the VCSN grid table and the ways a caller
//! can refer to a station.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A single virtual climate station from the grid table.
///
/// VCSN stations ("agents") sit on a regular ~5 km grid. They are identified by an
/// integer agent number assigned by NIWA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStation {
    /// NIWA agent number (`AGENT_NO` column).
    pub id: i64,
    /// Latitude in decimal degrees (`LAT` column).
    pub latitude: f64,
    /// Longitude in decimal degrees (`LONGT` column).
    pub longitude: f64,
}

/// A geographical coordinate, latitude first.
///
/// # Examples
///
/// ```
/// use vcsn::LatLon;
///
/// let wellington = LatLon(-41.2865, 174.7762);
/// assert_eq!(wellington.0, -41.2865);
/// assert_eq!(wellington.1, 174.7762);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl Display for LatLon {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// How a station is selected on a [`crate::Vcsn`] client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StationRef {
    /// A known agent number. Stored as-is, without checking the grid table.
    ById(i64),
    /// A location; the nearest grid station is resolved and stored.
    ByCoordinates(LatLon),
}

impl From<i64> for StationRef {
    fn from(value: i64) -> Self {
        StationRef::ById(value)
    }
}

impl From<LatLon> for StationRef {
    fn from(value: LatLon) -> Self {
        StationRef::ByCoordinates(value)
    }
}

impl From<(f64, f64)> for StationRef {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        StationRef::ByCoordinates(LatLon(latitude, longitude))
    }
}
