//! Source metadata carried from extraction through to the enriched payload.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// chrono pattern for every timestamp the pipeline writes (ISO 8601, local
/// time, microseconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Format of a tabular source file, resolved once from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Json,
    /// Anything the pipeline did not produce itself.
    #[default]
    #[serde(other)]
    Unknown,
}

impl SourceFormat {
    /// Resolve the format from a file extension (case-insensitive).
    ///
    /// Returns `None` for unsupported extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(SourceFormat::Csv)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(SourceFormat::Json)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Json => "json",
            SourceFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata describing where a table came from.
///
/// Keys the pipeline does not know about are kept in `extra` and written back
/// out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(default)]
    pub filename: String,
    /// ISO 8601 timestamp of extraction.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub source_format: SourceFormat,
    #[serde(default)]
    pub row_count: usize,
    #[serde(default)]
    pub column_count: usize,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceMetadata {
    /// Build fresh metadata for a table read directly from a file.
    pub fn new(
        filename: impl Into<String>,
        timestamp: impl Into<String>,
        source_format: SourceFormat,
        row_count: usize,
        columns: Vec<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            timestamp: timestamp.into(),
            source_format,
            row_count,
            column_count: columns.len(),
            columns,
            extra: Map::new(),
        }
    }
}

/// The `{metadata, data}` document written by extraction and read back by
/// the loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceEnvelope {
    pub metadata: SourceMetadata,
    pub data: Vec<Map<String, Value>>,
}
