//! CSV file reading.

use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

/// Number of rows polars looks at when inferring column dtypes.
pub const INFER_SCHEMA_ROWS: usize = 100;

/// Reads a CSV file with a single header row into a DataFrame.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    std::fs::metadata(path).map_err(|e| IngestError::read(path, e))?;

    let parse_error = |e: PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(parse_error)?
        .finish()
        .map_err(parse_error)
}
