use crate::reference::csv_source::{i64_column, read_csv_bytes, read_csv_file, string_column};
use crate::reference::error::ReferenceTableError;
use crate::types::measurement::{MeasurementRef, MeasurementType};
use crate::types::time_series::TIMESTAMP_COLUMN;
use polars::prelude::DataFrame;
use std::collections::HashMap;
use std::path::Path;

pub const MEASUREMENT_TABLE_FILE_NAME: &str = "VCSNRequiredmeasurements_all.csv";

const NAME_COLUMN: &str = "propName";
const CODE_COLUMN: &str = "PRODUCTID";

/// Catalog of measurement names and their provider product codes.
///
/// Lookups are exact-match in both directions. When a name or code appears more
/// than once, the first row wins.
#[derive(Debug, Clone)]
pub struct MeasurementTable {
    measurements: Vec<MeasurementType>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<i64, usize>,
}

impl MeasurementTable {
    /// Loads the catalog from a CSV file with `propName` and `PRODUCTID` columns.
    pub fn from_path(path: &Path) -> Result<Self, ReferenceTableError> {
        let df = read_csv_file(path)?;
        Self::from_frame(&path.display().to_string(), &df)
    }

    /// Loads the catalog from in-memory CSV content. `table` names the source in errors.
    pub fn from_csv_bytes(table: &str, bytes: impl Into<Vec<u8>>) -> Result<Self, ReferenceTableError> {
        let df = read_csv_bytes(table, bytes.into())?;
        Self::from_frame(table, &df)
    }

    fn from_frame(table: &str, df: &DataFrame) -> Result<Self, ReferenceTableError> {
        let names = string_column(df, table, NAME_COLUMN)?;
        let codes = i64_column(df, table, CODE_COLUMN)?;
        let measurements: Vec<MeasurementType> = names
            .into_iter()
            .zip(codes)
            .map(|(name, code)| MeasurementType { name, code })
            .collect();

        if measurements.is_empty() {
            return Err(ReferenceTableError::Empty(table.to_string()));
        }
        Self::from_measurements(table, measurements)
    }

    /// Builds the catalog from entries in table order.
    ///
    /// A measurement may not be called `timestamp`, since fetched frames use that
    /// name for their time column.
    pub fn from_measurements(
        table: &str,
        measurements: Vec<MeasurementType>,
    ) -> Result<Self, ReferenceTableError> {
        if let Some(row) = measurements
            .iter()
            .position(|m| m.name == TIMESTAMP_COLUMN)
        {
            return Err(ReferenceTableError::ReservedName {
                table: table.to_string(),
                name: TIMESTAMP_COLUMN.to_string(),
                row,
            });
        }
        let mut by_name = HashMap::with_capacity(measurements.len());
        let mut by_code = HashMap::with_capacity(measurements.len());
        for (index, measurement) in measurements.iter().enumerate() {
            by_name.entry(measurement.name.clone()).or_insert(index);
            by_code.entry(measurement.code).or_insert(index);
        }
        Ok(Self {
            measurements,
            by_name,
            by_code,
        })
    }

    /// Product code for a measurement name.
    pub fn code(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).map(|&i| self.measurements[i].code)
    }

    /// Measurement name for a product code.
    pub fn name(&self, code: i64) -> Option<&str> {
        self.by_code
            .get(&code)
            .map(|&i| self.measurements[i].name.as_str())
    }

    /// Resolves either kind of reference to its table entry.
    pub fn resolve(&self, measurement: &MeasurementRef) -> Option<&MeasurementType> {
        let index = match measurement {
            MeasurementRef::ByName(name) => self.by_name.get(name.as_str()),
            MeasurementRef::ByCode(code) => self.by_code.get(code),
        };
        index.map(|&i| &self.measurements[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeasurementType> {
        self.measurements.iter()
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEASUREMENTS_CSV: &str = "propName,PRODUCTID\n\
        rain,1\n\
        tmax,4\n\
        tmin,5\n\
        soil moisture,19\n";

    #[test]
    fn name_and_code_round_trip_for_every_row() {
        let table = MeasurementTable::from_csv_bytes("measurements", MEASUREMENTS_CSV).unwrap();
        assert_eq!(table.len(), 4);
        for measurement in table.iter() {
            let code = table.code(&measurement.name).unwrap();
            assert_eq!(table.name(code), Some(measurement.name.as_str()));
        }
    }

    #[test]
    fn resolves_both_reference_kinds() {
        let table = MeasurementTable::from_csv_bytes("measurements", MEASUREMENTS_CSV).unwrap();
        let by_name = table.resolve(&MeasurementRef::from("soil moisture")).unwrap();
        assert_eq!(by_name.code, 19);
        let by_code = table.resolve(&MeasurementRef::from(4_i64)).unwrap();
        assert_eq!(by_code.name, "tmax");
        assert!(table.resolve(&MeasurementRef::from("snow")).is_none());
        assert!(table.resolve(&MeasurementRef::from(77_i64)).is_none());
    }

    #[test]
    fn lookups_are_exact_match() {
        let table = MeasurementTable::from_csv_bytes("measurements", MEASUREMENTS_CSV).unwrap();
        assert_eq!(table.code("Rain"), None);
        assert_eq!(table.code("rai"), None);
    }

    #[test]
    fn first_duplicate_wins() {
        let table = MeasurementTable::from_measurements(
            "measurements",
            vec![
                MeasurementType {
                    name: "rain".to_string(),
                    code: 1,
                },
                MeasurementType {
                    name: "rain".to_string(),
                    code: 2,
                },
            ],
        )
        .unwrap();
        assert_eq!(table.code("rain"), Some(1));
        assert_eq!(table.name(2), Some("rain"));
    }

    #[test]
    fn timestamp_is_not_a_measurement_name() {
        let err = MeasurementTable::from_csv_bytes(
            "measurements",
            "propName,PRODUCTID\nrain,1\ntimestamp,2\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ReferenceTableError::ReservedName { ref name, row: 1, .. } if name == "timestamp"
        ));
    }

    #[test]
    fn legacy_encoded_table_still_loads() {
        // "temp °C" encoded as Windows-1252, which is not valid UTF-8.
        let mut bytes = b"propName,PRODUCTID\nrain,1\ntemp ".to_vec();
        bytes.push(0xB0);
        bytes.extend_from_slice(b"C,3\n");

        let table = MeasurementTable::from_csv_bytes("legacy", bytes).unwrap();
        assert_eq!(table.code("rain"), Some(1));
        assert_eq!(table.len(), 2);
        assert_eq!(table.code("temp °C"), Some(3));
        assert_eq!(table.name(3), Some("temp °C"));
    }

    #[test]
    fn non_integer_code_is_rejected() {
        let err = MeasurementTable::from_csv_bytes("measurements", "propName,PRODUCTID\nrain,one\n")
            .unwrap_err();
        assert!(matches!(err, ReferenceTableError::InvalidValue { .. }));
    }
}
