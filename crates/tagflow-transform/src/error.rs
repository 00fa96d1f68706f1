use polars::prelude::PolarsError;
use thiserror::Error;

/// Fatal engine errors.
///
/// Per-column transformation failures are not errors; they are reported as
/// [`crate::ColumnOutcome::Skipped`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("input table is empty ({columns} columns, {rows} rows)")]
    EmptyInput { columns: usize, rows: usize },

    #[error("failed to build row records: {0}")]
    Records(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
