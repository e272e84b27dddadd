use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LocateStationError {
    #[error("Coordinate ({lat}, {lon}) is out of range; expected -90 < lat < 90 and -180 < lon < 360")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Search radius {0} must be a finite, non-negative number of degrees")]
    InvalidRadius(f64),

    #[error("No grid station within {radius} degrees of ({lat}, {lon})")]
    NotFound { lat: f64, lon: f64, radius: f64 },
}
