//! Static lookup tables loaded once at startup: the station grid and the
//! measurement catalog.

pub mod csv_source;
pub mod error;
pub mod grid_table;
pub mod measurement_table;

use crate::reference::error::ReferenceTableError;
use crate::reference::grid_table::{GridTable, GRID_TABLE_FILE_NAME};
use crate::reference::measurement_table::{MeasurementTable, MEASUREMENT_TABLE_FILE_NAME};
use log::info;
use std::path::Path;

/// Both reference tables, as injected into a [`crate::Vcsn`] client.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    pub grid: GridTable,
    pub measurements: MeasurementTable,
}

impl ReferenceTables {
    pub fn new(grid: GridTable, measurements: MeasurementTable) -> Self {
        Self { grid, measurements }
    }

    /// Loads `VCSN_SitesExample.csv` and `VCSNRequiredmeasurements_all.csv` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, ReferenceTableError> {
        let grid = GridTable::from_path(&dir.join(GRID_TABLE_FILE_NAME))?;
        let measurements = MeasurementTable::from_path(&dir.join(MEASUREMENT_TABLE_FILE_NAME))?;
        info!(
            "Loaded {} grid stations and {} measurement types from {}",
            grid.len(),
            measurements.len(),
            dir.display()
        );
        Ok(Self { grid, measurements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_default_file_names_from_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(GRID_TABLE_FILE_NAME),
            "AGENT_NO,LAT,LONGT\n1,-41.0,174.0\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(MEASUREMENT_TABLE_FILE_NAME),
            "propName,PRODUCTID\nrain,1\n",
        )
        .unwrap();

        let tables = ReferenceTables::from_dir(dir.path()).unwrap();
        assert_eq!(tables.grid.len(), 1);
        assert_eq!(tables.measurements.code("rain"), Some(1));
    }

    #[test]
    fn missing_measurement_table_fails() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(GRID_TABLE_FILE_NAME),
            "AGENT_NO,LAT,LONGT\n1,-41.0,174.0\n",
        )
        .unwrap();
        let err = ReferenceTables::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ReferenceTableError::Read(..)));
    }
}
