//! Shared utilities for tagflow crates.
//!
//! This crate provides common utilities used across the tagflow workspace,
//! mainly conversions between Polars `AnyValue`s, plain strings and JSON, plus
//! the append-only CSV log used for router and audit records.

pub mod csv_log;
pub mod polars;

pub use crate::csv_log::CsvLog;

// Re-export commonly used functions at crate root for convenience
pub use crate::polars::{
    any_to_f64, any_to_json, any_to_string, column_names, format_numeric, is_numeric_dtype,
    is_temporal_dtype, parse_f64, row_records,
};
