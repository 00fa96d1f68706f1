//! Column kind inference.
//!
//! Each column is classified by its first non-null value. Nothing else in the
//! column is looked at, so a column is whatever its first value says it is.
//! Columns with no values fall back to their dtype.
//!
//! A loader that stores a mixed column under a wider dtype (JSON text, for
//! instance) can pass the kind of the column's first source value, which
//! then takes precedence.

use polars::prelude::{AnyValue, Column, DataFrame, DataType};
use tracing::debug;

use tagflow_common::{is_numeric_dtype, is_temporal_dtype};
use tagflow_model::{ColumnKind, ColumnKinds};

/// Infer the kind of every column, in table column order.
pub fn inspect_kinds(df: &DataFrame) -> ColumnKinds {
    inspect_kinds_with_samples(df, &ColumnKinds::default())
}

/// Like [`inspect_kinds`], but a column listed in `samples` takes the kind of
/// its first source value from there.
pub fn inspect_kinds_with_samples(df: &DataFrame, samples: &ColumnKinds) -> ColumnKinds {
    df.get_columns()
        .iter()
        .map(|column| {
            let kind = samples
                .get(column.name().as_str())
                .copied()
                .unwrap_or_else(|| column_kind(column));
            debug!(column = %column.name(), kind = %kind, "inferred column kind");
            (column.name().to_string(), kind)
        })
        .collect()
}

/// Kind of a single column.
pub fn column_kind(column: &Column) -> ColumnKind {
    let non_null = column.as_materialized_series().drop_nulls();
    match non_null.get(0) {
        Ok(value) if !value.is_null() => value_kind(&value),
        _ => dtype_kind(column.dtype()),
    }
}

/// Kind of a single runtime value.
pub fn value_kind(value: &AnyValue<'_>) -> ColumnKind {
    match value {
        AnyValue::Boolean(_) => ColumnKind::Boolean,
        AnyValue::String(_) | AnyValue::StringOwned(_) => ColumnKind::String,
        other => dtype_kind(&other.dtype()),
    }
}

fn dtype_kind(dtype: &DataType) -> ColumnKind {
    if dtype.is_integer() {
        ColumnKind::Integer
    } else if is_numeric_dtype(dtype) {
        ColumnKind::Float
    } else if is_temporal_dtype(dtype) {
        ColumnKind::Date
    } else if matches!(dtype, DataType::Boolean) {
        ColumnKind::Boolean
    } else {
        ColumnKind::String
    }
}
