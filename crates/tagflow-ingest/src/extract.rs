//! Extraction and loading of source tables.
//!
//! Extraction reads raw CSV/JSON files and normalizes column names. Loading
//! reads the result back (or any other CSV/JSON file) for the engine.

use std::path::Path;

use polars::prelude::DataFrame;
use serde_json::Value;
use tracing::{debug, info};

use tagflow_common::{column_names, row_records};
use tagflow_model::{ColumnKinds, SourceEnvelope, SourceFormat, SourceMetadata};

use crate::error::{IngestError, Result};
use crate::naming::{flatten_record, snake_case_columns};
use crate::reader::read_csv_table;
use crate::records::{
    Record, aligned_records, first_value_kinds, json_records, records_to_frame,
};

/// A table together with the metadata describing where it came from.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub table: DataFrame,
    pub metadata: SourceMetadata,
    /// Kind of each column's first non-null source value, for JSON sources.
    ///
    /// A JSON column with mixed values is stored as text; this keeps the
    /// kind its first value had. Empty for CSV, whose dtypes already match.
    pub value_kinds: ColumnKinds,
    /// Rows as read, for JSON sources. The envelope writes these so mixed
    /// columns keep their original values.
    source_rows: Option<Vec<Record>>,
}

impl SourceTable {
    /// Wrap a table read straight from `path` with fresh metadata.
    fn fresh(path: &Path, format: SourceFormat, table: DataFrame, timestamp: &str) -> Self {
        let metadata = fresh_metadata(path, format, &table, timestamp);
        Self {
            table,
            metadata,
            value_kinds: ColumnKinds::default(),
            source_rows: None,
        }
    }

    /// Build a table from JSON records, keeping first-value kinds and the rows.
    fn from_records(records: &[Record], metadata: SourceMetadata) -> Result<Self> {
        Ok(Self {
            table: records_to_frame(records)?,
            metadata,
            value_kinds: first_value_kinds(records),
            source_rows: Some(aligned_records(records)),
        })
    }

    /// The `{metadata, data}` document for this table.
    pub fn to_envelope(&self) -> Result<SourceEnvelope> {
        let data = match &self.source_rows {
            Some(rows) => rows.clone(),
            None => row_records(&self.table)?,
        };
        Ok(SourceEnvelope {
            metadata: self.metadata.clone(),
            data,
        })
    }
}

/// Read a raw CSV or JSON file, snake-case its column names and flatten
/// nested JSON objects.
///
/// `extracted_at` becomes the metadata timestamp.
pub fn extract_file(path: &Path, extracted_at: &str) -> Result<SourceTable> {
    let format = source_format(path)?;
    let extracted = match format {
        SourceFormat::Csv => {
            let mut table = read_csv_table(path)?;
            snake_case_columns(&mut table)?;
            SourceTable::fresh(path, format, table, extracted_at)
        }
        _ => {
            let records = json_records(path, read_json(path)?)?;
            let flat: Vec<_> = records.into_iter().map(flatten_record).collect();
            fresh_from_records(path, format, &flat, extracted_at)?
        }
    };
    info!(
        path = %path.display(),
        format = %format,
        rows = extracted.table.height(),
        columns = extracted.table.width(),
        "Extracted source file"
    );
    Ok(extracted)
}

/// Read a CSV or JSON file for the engine.
///
/// A JSON object holding both `metadata` and `data` is treated as an
/// envelope and its metadata is kept. Anything else gets fresh metadata
/// stamped with `loaded_at`.
pub fn load_file(path: &Path, loaded_at: &str) -> Result<SourceTable> {
    let format = source_format(path)?;
    let loaded = match format {
        SourceFormat::Csv => SourceTable::fresh(path, format, read_csv_table(path)?, loaded_at),
        _ => match read_json(path)? {
            Value::Object(mut map) if map.contains_key("metadata") && map.contains_key("data") => {
                let metadata = map.remove("metadata").unwrap_or_default();
                let metadata: SourceMetadata =
                    serde_json::from_value(metadata).map_err(|source| IngestError::JsonParse {
                        path: path.to_path_buf(),
                        source,
                    })?;
                let data = map.remove("data").unwrap_or_default();
                debug!(path = %path.display(), "Loaded envelope metadata");
                SourceTable::from_records(&json_records(path, data)?, metadata)?
            }
            document => {
                fresh_from_records(path, format, &json_records(path, document)?, loaded_at)?
            }
        },
    };
    info!(
        path = %path.display(),
        rows = loaded.table.height(),
        columns = loaded.table.width(),
        "Loaded table"
    );
    Ok(loaded)
}

fn fresh_from_records(
    path: &Path,
    format: SourceFormat,
    records: &[Record],
    timestamp: &str,
) -> Result<SourceTable> {
    let mut source = SourceTable::from_records(records, SourceMetadata::default())?;
    source.metadata = fresh_metadata(path, format, &source.table, timestamp);
    Ok(source)
}

fn fresh_metadata(
    path: &Path,
    format: SourceFormat,
    table: &DataFrame,
    timestamp: &str,
) -> SourceMetadata {
    SourceMetadata::new(
        file_name(path),
        timestamp,
        format,
        table.height(),
        column_names(table),
    )
}

fn source_format(path: &Path) -> Result<SourceFormat> {
    SourceFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })
}

fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
    serde_json::from_str(&text).map_err(|source| IngestError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
