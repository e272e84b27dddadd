use crate::cache::error::CacheError;
use crate::http::error::TransportError;
use crate::reference::error::ReferenceTableError;
use crate::stations::error::LocateStationError;
use crate::types::measurement::MeasurementRef;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsnError {
    #[error(transparent)]
    ReferenceTable(#[from] ReferenceTableError),

    #[error(transparent)]
    LocateStation(#[from] LocateStationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Unknown measurement '{0}'; it is not in the measurement table")]
    UnknownMeasurement(MeasurementRef),

    #[error("No station selected; call select_station before fetching data")]
    NoStationSelected,

    #[error("Could not parse '{0}' as a date or datetime")]
    DateParsing(String),
}
