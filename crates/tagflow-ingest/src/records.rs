//! JSON records to DataFrame.
//!
//! Each column gets a single dtype from its non-null values: all booleans
//! become `Boolean`, all integers `Int64`, any mix of numbers `Float64`, all
//! strings `String`. Mixed columns fall back to `String`, with non-string
//! values written as JSON text.
//!
//! The dtype describes the whole column, while column kinds come from the
//! first non-null value alone. [`first_value_kinds`] keeps that value's kind
//! so a mixed column such as `[20, "N/A", 40]` still reads as an integer
//! column.

use std::collections::HashSet;
use std::path::Path;

use polars::prelude::{Column, DataFrame, NamedFrom, Series};
use serde_json::{Map, Value};
use tagflow_model::{ColumnKind, ColumnKinds};

use crate::error::{IngestError, Result};

/// One row of a JSON source.
pub type Record = Map<String, Value>;

/// Split a parsed JSON document into records.
///
/// Accepted shapes: a list of objects, an object whose values are all objects
/// (one row per value), or a single object (one row).
pub fn json_records(path: &Path, document: Value) -> Result<Vec<Record>> {
    let shape_error = |reason: &str| IngestError::JsonShape {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };
    match document {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                _ => Err(shape_error("list items must be objects")),
            })
            .collect(),
        Value::Object(map) => {
            if !map.is_empty() && map.values().all(Value::is_object) {
                Ok(map
                    .into_iter()
                    .filter_map(|(_, value)| match value {
                        Value::Object(record) => Some(record),
                        _ => None,
                    })
                    .collect())
            } else {
                Ok(vec![map])
            }
        }
        _ => Err(shape_error("expected an object or a list of objects")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueClass {
    Empty,
    Bool,
    Int,
    Float,
    Text,
    Mixed,
}

impl ValueClass {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueClass::Empty,
            Value::Bool(_) => ValueClass::Bool,
            Value::Number(n) if n.is_i64() => ValueClass::Int,
            Value::Number(_) => ValueClass::Float,
            Value::String(_) => ValueClass::Text,
            Value::Array(_) | Value::Object(_) => ValueClass::Mixed,
        }
    }

    fn merge(self, other: Self) -> Self {
        use ValueClass::{Empty, Float, Int, Mixed};
        match (self, other) {
            (Empty, x) | (x, Empty) => x,
            (a, b) if a == b => a,
            (Int, Float) | (Float, Int) => Float,
            _ => Mixed,
        }
    }
}

/// Build a DataFrame from records. Columns appear in first-seen order; keys
/// missing from a record are null.
pub fn records_to_frame(records: &[Record]) -> Result<DataFrame> {
    let names = column_order(records);
    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let values: Vec<&Value> = records
            .iter()
            .map(|record| record.get(name).unwrap_or(&Value::Null))
            .collect();
        columns.push(build_column(name, &values));
    }
    Ok(DataFrame::new(columns)?)
}

/// Kind of each column's first non-null value, in first-seen column order.
///
/// Columns without a non-null value are left out.
pub fn first_value_kinds(records: &[Record]) -> ColumnKinds {
    column_order(records)
        .into_iter()
        .filter_map(|name| {
            records
                .iter()
                .filter_map(|record| record.get(name))
                .find(|value| !value.is_null())
                .map(|value| (name.to_string(), json_kind(value)))
        })
        .collect()
}

/// Records with every column present (missing keys as null), keys in
/// first-seen column order.
pub fn aligned_records(records: &[Record]) -> Vec<Record> {
    let names = column_order(records);
    records
        .iter()
        .map(|record| {
            names
                .iter()
                .map(|name| {
                    let value = record.get(*name).cloned().unwrap_or(Value::Null);
                    (name.to_string(), value)
                })
                .collect()
        })
        .collect()
}

fn json_kind(value: &Value) -> ColumnKind {
    match value {
        Value::Bool(_) => ColumnKind::Boolean,
        Value::Number(n) if n.is_i64() || n.is_u64() => ColumnKind::Integer,
        Value::Number(_) => ColumnKind::Float,
        _ => ColumnKind::String,
    }
}

fn column_order(records: &[Record]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for record in records {
        for key in record.keys() {
            if seen.insert(key.as_str()) {
                names.push(key.as_str());
            }
        }
    }
    names
}

fn build_column(name: &str, values: &[&Value]) -> Column {
    let class = values
        .iter()
        .fold(ValueClass::Empty, |acc, value| acc.merge(ValueClass::of(value)));
    let series = match class {
        ValueClass::Empty => Series::new_null(name.into(), values.len()),
        ValueClass::Bool => {
            let data: Vec<Option<bool>> = values.iter().map(|v| v.as_bool()).collect();
            Series::new(name.into(), data)
        }
        ValueClass::Int => {
            let data: Vec<Option<i64>> = values.iter().map(|v| v.as_i64()).collect();
            Series::new(name.into(), data)
        }
        ValueClass::Float => {
            let data: Vec<Option<f64>> = values.iter().map(|v| v.as_f64()).collect();
            Series::new(name.into(), data)
        }
        ValueClass::Text | ValueClass::Mixed => {
            let data: Vec<Option<String>> = values.iter().map(|v| value_text(v)).collect();
            Series::new(name.into(), data)
        }
    };
    series.into()
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
