//! Date standardization.
//!
//! Every non-null value of a tagged column must parse as a date; one failure
//! leaves the whole column untouched. Parsed values are rewritten as text in
//! the target strftime pattern.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{Column, DataFrame, DataType, NamedFrom, PolarsResult, Series, TimeUnit};

use tagflow_common::is_temporal_dtype;
use tagflow_model::DateStandardization;

use super::outcome::{AppliedParams, ColumnOutcome, SkipReason};

/// Datetime patterns tried in order before the date-only patterns.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y%m%d",
];

/// Parse a date or datetime written in one of the common layouts.
///
/// Date-only values resolve to midnight. Offsets are dropped and the wall
/// clock time is kept.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Standardize one column of `df` in place.
pub(crate) fn standardize_column(
    df: &mut DataFrame,
    name: &str,
    spec: &DateStandardization,
) -> PolarsResult<ColumnOutcome> {
    let column = df.column(name)?;
    let dtype = column.dtype().clone();
    let parsed = if is_temporal_dtype(&dtype) {
        temporal_values(column, &dtype)?
    } else if matches!(dtype, DataType::String) {
        let mut parsed = Vec::with_capacity(column.len());
        for value in column.str()? {
            match value {
                None => parsed.push(None),
                Some(text) if text.trim().is_empty() => parsed.push(None),
                Some(text) => match parse_datetime(text) {
                    Some(dt) => parsed.push(Some(dt)),
                    None => {
                        return Ok(ColumnOutcome::Skipped(SkipReason::UnparsableDate {
                            value: text.to_string(),
                        }));
                    }
                },
            }
        }
        parsed
    } else {
        return Ok(ColumnOutcome::Skipped(SkipReason::NotDateColumn {
            dtype: dtype.to_string(),
        }));
    };

    let mut formatted = Vec::with_capacity(parsed.len());
    for value in parsed {
        match value {
            None => formatted.push(None),
            Some(dt) => {
                let mut text = String::new();
                if write!(text, "{}", dt.format(&spec.target_format)).is_err() {
                    return Ok(ColumnOutcome::Skipped(SkipReason::Failed {
                        message: format!(
                            "cannot format dates with '{}'",
                            spec.target_format
                        ),
                    }));
                }
                formatted.push(Some(text));
            }
        }
    }

    df.with_column(Series::new(name.into(), formatted))?;
    Ok(ColumnOutcome::Applied(AppliedParams::Date {
        target_format: spec.target_format.clone(),
    }))
}

/// Values of a native Date/Datetime column.
fn temporal_values(column: &Column, dtype: &DataType) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    match dtype {
        DataType::Date => {
            let days = column.cast(&DataType::Int32)?;
            let days = days.as_materialized_series().i32()?;
            Ok(days
                .into_iter()
                .map(|d| d.and_then(date_from_epoch_days))
                .collect())
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let ticks = column.cast(&DataType::Int64)?;
            let ticks = ticks.as_materialized_series().i64()?;
            Ok(ticks
                .into_iter()
                .map(|t| t.and_then(|t| datetime_from_ticks(t, unit)))
                .collect())
        }
        _ => Ok(Vec::new()),
    }
}

/// Days since 1970-01-01, as counted by polars `Date`.
fn date_from_epoch_days(days: i32) -> Option<NaiveDateTime> {
    days.checked_add(EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn datetime_from_ticks(ticks: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let dt = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(ticks)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(ticks),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(ticks),
    };
    dt.map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn parses_common_layouts() {
        let expected = ymd(2025, 1, 15);
        for text in [
            "2025-01-15",
            "2025/01/15",
            "01/15/2025",
            "01-15-2025",
            "15.01.2025",
            "January 15, 2025",
            "Jan 15, 2025",
            "15 January 2025",
            "20250115",
        ] {
            assert_eq!(parse_datetime(text), Some(expected), "{text}");
        }
    }

    #[test]
    fn parses_datetimes() {
        let dt = parse_datetime("2025-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2025-01-15 10:30");
        let dt = parse_datetime("2025-01-15 10:30:05.250").unwrap();
        assert_eq!(dt.format("%H:%M:%S%.3f").to_string(), "10:30:05.250");
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_datetime("soon"), None);
        assert_eq!(parse_datetime("13/45/2025"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn epoch_helpers() {
        assert_eq!(date_from_epoch_days(0), Some(ymd(1970, 1, 1)));
        assert_eq!(date_from_epoch_days(20_103), Some(ymd(2025, 1, 15)));
        assert_eq!(
            datetime_from_ticks(86_400_000, TimeUnit::Milliseconds),
            Some(ymd(1970, 1, 2))
        );
    }
}
