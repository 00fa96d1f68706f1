//! The transformation audit log: one CSV row per processed file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use tagflow_common::CsvLog;
use tagflow_model::{AppliedTransformations, FieldTagAssignment, SourceFormat};

/// Audit log columns.
pub const AUDIT_LOG_HEADER: &[&str] = &[
    "timestamp",
    "filename",
    "source_format",
    "row_count",
    "column_count",
    "applied_tags",
    "applied_transformations",
    "status",
    "output_path",
];

/// One audit row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub timestamp: String,
    pub filename: String,
    pub source_format: String,
    pub row_count: usize,
    pub column_count: usize,
    /// `col:tag1,tag2;col2:tag`, untagged columns omitted.
    pub applied_tags: String,
    /// `kind:col1,col2;kind2:col`.
    pub applied_transformations: String,
    /// `success` or `error: <message>`.
    pub status: String,
    pub output_path: String,
}

impl AuditRecord {
    /// Row for a file that was transformed and forwarded. Counts describe the
    /// input table.
    #[allow(clippy::too_many_arguments)]
    pub fn success(
        timestamp: impl Into<String>,
        filename: impl Into<String>,
        source_format: SourceFormat,
        row_count: usize,
        column_count: usize,
        field_tags: &FieldTagAssignment,
        applied: &AppliedTransformations,
        output_path: &Path,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            filename: filename.into(),
            source_format: source_format.to_string(),
            row_count,
            column_count,
            applied_tags: format_applied_tags(field_tags),
            applied_transformations: format_applied_transformations(applied),
            status: "success".to_string(),
            output_path: output_path.display().to_string(),
        }
    }

    /// Row for a file that failed anywhere in the run.
    pub fn failure(
        timestamp: impl Into<String>,
        filename: impl Into<String>,
        message: &str,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            filename: filename.into(),
            source_format: SourceFormat::Unknown.to_string(),
            row_count: 0,
            column_count: 0,
            applied_tags: String::new(),
            applied_transformations: String::new(),
            status: format!("error: {message}"),
            output_path: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Fields in header order.
    pub fn to_row(&self) -> [String; 9] {
        [
            self.timestamp.clone(),
            self.filename.clone(),
            self.source_format.clone(),
            self.row_count.to_string(),
            self.column_count.to_string(),
            self.applied_tags.clone(),
            self.applied_transformations.clone(),
            self.status.clone(),
            self.output_path.clone(),
        ]
    }
}

pub fn format_applied_tags(field_tags: &FieldTagAssignment) -> String {
    field_tags
        .tagged()
        .map(|(column, tags)| format!("{column}:{}", tags.join(",")))
        .collect::<Vec<_>>()
        .join(";")
}

pub fn format_applied_transformations(applied: &AppliedTransformations) -> String {
    applied
        .transformed_columns()
        .into_iter()
        .filter(|(_, columns)| !columns.is_empty())
        .map(|(kind, columns)| format!("{kind}:{}", columns.join(",")))
        .collect::<Vec<_>>()
        .join(";")
}

/// Append-only audit log file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    log: CsvLog,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            log: CsvLog::new(path, AUDIT_LOG_HEADER),
        }
    }

    pub fn path(&self) -> &Path {
        self.log.path()
    }

    /// Create the log with its header row if it does not exist.
    pub fn initialize(&self) -> Result<()> {
        self.log
            .initialize()
            .with_context(|| format!("initialize audit log {}", self.path().display()))
    }

    pub fn append(&self, record: &AuditRecord) -> Result<()> {
        self.log
            .append(record.to_row())
            .with_context(|| format!("append to audit log {}", self.path().display()))?;
        debug!(filename = %record.filename, status = %record.status, "Audit row written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagflow_model::{DateStandardizationMetadata, OneHotEncodingMetadata};

    fn field_tags() -> FieldTagAssignment {
        [
            ("signup_date", vec!["temporal".to_string()]),
            ("id", vec![]),
            (
                "status",
                vec!["category".to_string(), "flag".to_string()],
            ),
        ]
        .into_iter()
        .collect()
    }

    fn applied() -> AppliedTransformations {
        AppliedTransformations {
            date_standardization: Some(DateStandardizationMetadata {
                transformed_columns: vec!["signup_date".to_string()],
                target_format: "%Y-%m-%d".to_string(),
            }),
            one_hot_encoding: Some(OneHotEncodingMetadata {
                transformed_columns: vec!["status".to_string(), "plan".to_string()],
                new_columns: vec!["status_on".to_string(), "status_off".to_string()],
                dropped_columns: vec!["status".to_string(), "plan".to_string()],
                max_categories: 20,
            }),
            numeric_normalization: None,
        }
    }

    #[test]
    fn success_row_formats_tags_and_transformations() {
        let record = AuditRecord::success(
            "2025-03-01T12:00:00.000000",
            "customers.json",
            SourceFormat::Csv,
            3,
            4,
            &field_tags(),
            &applied(),
            Path::new("data/enriched/customers.json"),
        );
        insta::assert_debug_snapshot!(record.to_row(), @r#"
        [
            "2025-03-01T12:00:00.000000",
            "customers.json",
            "csv",
            "3",
            "4",
            "signup_date:temporal;status:category,flag",
            "date_standardization:signup_date;one_hot_encoding:status,plan",
            "success",
            "data/enriched/customers.json",
        ]
        "#);
        assert!(record.is_success());
    }

    #[test]
    fn failure_row_is_blank_apart_from_status() {
        let record = AuditRecord::failure("t", "broken.json", "unexpected end of input");
        assert_eq!(record.source_format, "unknown");
        assert_eq!(record.row_count, 0);
        assert_eq!(record.status, "error: unexpected end of input");
        assert!(record.output_path.is_empty());
        assert!(!record.is_success());
    }
}
