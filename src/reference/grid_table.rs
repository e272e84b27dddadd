use crate::reference::csv_source::{f64_column, i64_column, read_csv_bytes, read_csv_file};
use crate::reference::error::ReferenceTableError;
use crate::types::station::GridStation;
use polars::prelude::DataFrame;
use std::path::Path;

pub const GRID_TABLE_FILE_NAME: &str = "VCSN_SitesExample.csv";

const ID_COLUMN: &str = "AGENT_NO";
const LATITUDE_COLUMN: &str = "LAT";
const LONGITUDE_COLUMN: &str = "LONGT";

/// The VCSN station grid, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTable {
    stations: Vec<GridStation>,
}

impl GridTable {
    /// Loads the grid from a CSV file with `AGENT_NO`, `LAT` and `LONGT` columns.
    pub fn from_path(path: &Path) -> Result<Self, ReferenceTableError> {
        let df = read_csv_file(path)?;
        Self::from_frame(&path.display().to_string(), &df)
    }

    /// Loads the grid from in-memory CSV content. `table` names the source in errors.
    pub fn from_csv_bytes(table: &str, bytes: impl Into<Vec<u8>>) -> Result<Self, ReferenceTableError> {
        let df = read_csv_bytes(table, bytes.into())?;
        Self::from_frame(table, &df)
    }

    fn from_frame(table: &str, df: &DataFrame) -> Result<Self, ReferenceTableError> {
        let ids = i64_column(df, table, ID_COLUMN)?;
        let latitudes = f64_column(df, table, LATITUDE_COLUMN)?;
        let longitudes = f64_column(df, table, LONGITUDE_COLUMN)?;

        let stations: Vec<GridStation> = ids
            .into_iter()
            .zip(latitudes)
            .zip(longitudes)
            .map(|((id, latitude), longitude)| GridStation {
                id,
                latitude,
                longitude,
            })
            .collect();

        if stations.is_empty() {
            return Err(ReferenceTableError::Empty(table.to_string()));
        }
        Ok(Self { stations })
    }

    pub fn from_stations(stations: Vec<GridStation>) -> Self {
        Self { stations }
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridStation> {
        self.stations.iter()
    }

    pub fn stations(&self) -> &[GridStation] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.stations.iter().any(|s| s.id == id)
    }
}
