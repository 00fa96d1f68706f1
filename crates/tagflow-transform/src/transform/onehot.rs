//! One-hot encoding.

use std::collections::BTreeSet;

use polars::prelude::{DataFrame, NamedFrom, PolarsResult, Series};

use tagflow_common::{any_to_f64, any_to_string, is_numeric_dtype};
use tagflow_model::OneHotEncoding;

use super::outcome::{AppliedParams, ColumnOutcome, SkipReason};

/// Replace one column of `df` with one boolean column per distinct value.
///
/// New columns are named `{column}_{value}` and appended at the end of the
/// table. Rows where the column is null are `false` everywhere.
pub(crate) fn encode_column(
    df: &mut DataFrame,
    name: &str,
    spec: &OneHotEncoding,
) -> PolarsResult<ColumnOutcome> {
    let series = df.column(name)?.as_materialized_series().clone();
    let numeric = is_numeric_dtype(series.dtype());

    let mut labels: Vec<Option<String>> = Vec::with_capacity(series.len());
    let mut distinct: BTreeSet<String> = BTreeSet::new();
    for idx in 0..series.len() {
        let value = series.get(idx)?;
        let is_nan = numeric && any_to_f64(value.clone()).is_some_and(f64::is_nan);
        if value.is_null() || is_nan {
            labels.push(None);
            continue;
        }
        let label = any_to_string(value);
        distinct.insert(label.clone());
        labels.push(Some(label));
    }

    if distinct.is_empty() {
        return Ok(ColumnOutcome::Skipped(SkipReason::NoValues));
    }
    if distinct.len() > spec.max_categories {
        return Ok(ColumnOutcome::Skipped(SkipReason::TooManyCategories {
            count: distinct.len(),
            max: spec.max_categories,
        }));
    }

    let categories = sorted_categories(distinct, numeric);
    let new_names: Vec<String> = categories
        .iter()
        .map(|category| format!("{name}_{category}"))
        .collect();
    for new_name in &new_names {
        if df.column(new_name).is_ok() {
            return Ok(ColumnOutcome::Skipped(SkipReason::NameCollision {
                column: new_name.clone(),
            }));
        }
    }

    let _ = df.drop_in_place(name)?;
    for (category, new_name) in categories.iter().zip(&new_names) {
        let flags: Vec<bool> = labels
            .iter()
            .map(|label| label.as_deref() == Some(category.as_str()))
            .collect();
        df.with_column(Series::new(new_name.as_str().into(), flags))?;
    }

    Ok(ColumnOutcome::Applied(AppliedParams::OneHot {
        new_columns: new_names,
    }))
}

/// Numeric columns sort by value, everything else by text.
fn sorted_categories(distinct: BTreeSet<String>, numeric: bool) -> Vec<String> {
    let mut categories: Vec<String> = distinct.into_iter().collect();
    if numeric {
        categories.sort_by(|a, b| match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.total_cmp(&y),
            _ => a.cmp(b),
        });
    }
    categories
}
