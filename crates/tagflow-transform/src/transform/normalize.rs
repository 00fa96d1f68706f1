//! Numeric normalization (min-max and z-score).

use polars::prelude::{DataFrame, DataType, NamedFrom, PolarsResult, Series};

use tagflow_common::is_numeric_dtype;
use tagflow_model::{NormalizationMethod, NormalizationRange, NumericNormalization};

use super::outcome::{AppliedParams, ColumnOutcome, SkipReason};

/// Rescale one column of `df` in place. The result is always `Float64`.
pub(crate) fn normalize_column(
    df: &mut DataFrame,
    name: &str,
    spec: &NumericNormalization,
) -> PolarsResult<ColumnOutcome> {
    let column = df.column(name)?;
    if !is_numeric_dtype(column.dtype()) {
        return Ok(ColumnOutcome::Skipped(SkipReason::NotNumeric {
            dtype: column.dtype().to_string(),
        }));
    }
    let floats = column.cast(&DataType::Float64)?;
    let values: Vec<Option<f64>> = floats
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.filter(|v| !v.is_nan()))
        .collect();

    let scaled = match spec.method {
        NormalizationMethod::MinMax => min_max(&values, spec.target_range),
        NormalizationMethod::ZScore => z_score(&values),
    };
    match scaled {
        Ok((scaled, range)) => {
            df.with_column(Series::new(name.into(), scaled))?;
            Ok(ColumnOutcome::Applied(AppliedParams::Normalized(range)))
        }
        Err(reason) => Ok(ColumnOutcome::Skipped(reason)),
    }
}

type Scaled = (Vec<Option<f64>>, NormalizationRange);

/// `(v - min) / (max - min) * (hi - lo) + lo`
pub fn min_max(values: &[Option<f64>], target: [f64; 2]) -> Result<Scaled, SkipReason> {
    let present = values.iter().flatten().copied();
    let (min, max) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        return Err(SkipReason::NoValues);
    }
    if min == max {
        return Err(SkipReason::ConstantColumn);
    }
    let [lo, hi] = target;
    let span = max - min;
    let scaled = values
        .iter()
        .map(|v| {
            v.map(|v| {
                if v == max {
                    hi
                } else {
                    (v - min) / span * (hi - lo) + lo
                }
            })
        })
        .collect();
    Ok((
        scaled,
        NormalizationRange::MinMax {
            original_range: [min, max],
            target_range: target,
        },
    ))
}

/// `(v - mean) / std` with the sample standard deviation.
pub fn z_score(values: &[Option<f64>]) -> Result<Scaled, SkipReason> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let n = present.len();
    if n == 0 {
        return Err(SkipReason::NoValues);
    }
    if n < 2 {
        return Err(SkipReason::TooFewValues { count: n });
    }
    let mean = present.iter().sum::<f64>() / n as f64;
    let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std = variance.sqrt();
    if std == 0.0 || !std.is_finite() {
        return Err(SkipReason::ZeroVariance);
    }
    let scaled = values.iter().map(|v| v.map(|v| (v - mean) / std)).collect();
    Ok((scaled, NormalizationRange::ZScore { mean, std }))
}
