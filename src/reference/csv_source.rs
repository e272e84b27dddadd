use crate::reference::error::ReferenceTableError;
use encoding_rs::WINDOWS_1252;
use log::{debug, warn};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Reads a CSV file with a header row into a DataFrame.
pub(crate) fn read_csv_file(path: &Path) -> Result<DataFrame, ReferenceTableError> {
    let bytes =
        std::fs::read(path).map_err(|e| ReferenceTableError::Read(path.to_path_buf(), e))?;
    read_csv_bytes(&path.display().to_string(), bytes)
}

/// Parses CSV bytes as UTF-8. Tables that are not valid UTF-8 are decoded as
/// Windows-1252 instead, the code page legacy exports of the catalog were saved in.
pub(crate) fn read_csv_bytes(table: &str, bytes: Vec<u8>) -> Result<DataFrame, ReferenceTableError> {
    let bytes = match std::str::from_utf8(&bytes) {
        Ok(_) => bytes,
        Err(e) => {
            warn!(
                "Reference table {} is not valid UTF-8 ({}), decoding as Windows-1252",
                table, e
            );
            let (decoded, _, _) = WINDOWS_1252.decode(&bytes);
            decoded.into_owned().into_bytes()
        }
    };
    let df = parse(bytes).map_err(|source| ReferenceTableError::CsvParse {
        table: table.to_string(),
        source,
    })?;
    debug!("Loaded reference table {} ({} rows)", table, df.height());
    Ok(df)
}

fn parse(bytes: Vec<u8>) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|options| options.with_encoding(CsvEncoding::Utf8))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

pub(crate) fn i64_column(
    df: &DataFrame,
    table: &str,
    column: &str,
) -> Result<Vec<i64>, ReferenceTableError> {
    let cast = typed_column(df, table, column, &DataType::Int64)?;
    let values = cast.i64().map_err(|e| missing(table, column, e))?;
    collect_required(values.into_iter(), table, column)
}

pub(crate) fn f64_column(
    df: &DataFrame,
    table: &str,
    column: &str,
) -> Result<Vec<f64>, ReferenceTableError> {
    let cast = typed_column(df, table, column, &DataType::Float64)?;
    let values = cast.f64().map_err(|e| missing(table, column, e))?;
    collect_required(values.into_iter(), table, column)
}

pub(crate) fn string_column(
    df: &DataFrame,
    table: &str,
    column: &str,
) -> Result<Vec<String>, ReferenceTableError> {
    let cast = typed_column(df, table, column, &DataType::String)?;
    let values = cast.str().map_err(|e| missing(table, column, e))?;
    collect_required(
        values.into_iter().map(|v| v.map(|s| s.trim().to_string())),
        table,
        column,
    )
}

fn typed_column(
    df: &DataFrame,
    table: &str,
    column: &str,
    dtype: &DataType,
) -> Result<Column, ReferenceTableError> {
    df.column(column)
        .and_then(|c| c.cast(dtype))
        .map_err(|e| missing(table, column, e))
}

fn collect_required<T>(
    values: impl Iterator<Item = Option<T>>,
    table: &str,
    column: &str,
) -> Result<Vec<T>, ReferenceTableError> {
    values
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| ReferenceTableError::InvalidValue {
                table: table.to_string(),
                column: column.to_string(),
                row,
            })
        })
        .collect()
}

fn missing(table: &str, column: &str, source: PolarsError) -> ReferenceTableError {
    ReferenceTableError::MissingColumn {
        table: table.to_string(),
        column: column.to_string(),
        source,
    }
}
