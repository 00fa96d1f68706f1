//! Rule-driven column transformations.
//!
//! Steps run in a fixed order: date standardization, one-hot encoding,
//! numeric normalization. Each step visits the columns carrying one of its
//! tags and reports a [`ColumnOutcome`] per column. No step fails the run; a
//! column that cannot be transformed is left as it was and reported as
//! skipped.

pub mod date;
pub mod normalize;
pub mod onehot;
pub mod outcome;

use indexmap::IndexMap;
use polars::prelude::{DataFrame, PolarsResult};
use tracing::{debug, info, info_span, warn};

use tagflow_model::{
    DateStandardizationMetadata, FieldTagAssignment, NumericNormalizationMetadata,
    OneHotEncodingMetadata, TransformationKind, TransformationMetadata,
    TransformationSpecs, applies_to_any,
};

pub use outcome::{AppliedParams, ColumnOutcome, ColumnReport, SkipReason, StepReport};

/// Result of [`Transformer::transform`].
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub table: DataFrame,
    pub metadata: TransformationMetadata,
    /// One report per configured step, in application order.
    pub steps: Vec<StepReport>,
}

/// Applies the transformation specs of a ruleset to tagged columns.
#[derive(Debug, Clone, Copy)]
pub struct Transformer<'a> {
    specs: &'a TransformationSpecs,
}

impl<'a> Transformer<'a> {
    pub fn new(specs: &'a TransformationSpecs) -> Self {
        Self { specs }
    }

    pub fn transform(&self, mut table: DataFrame, tags: &FieldTagAssignment) -> TransformOutput {
        let mut metadata = TransformationMetadata::default();
        let mut steps = Vec::new();

        if let Some(spec) = &self.specs.date_standardization {
            let report = run_step(
                &mut table,
                TransformationKind::DateStandardization,
                &targets(tags, &spec.applies_to_tags),
                |df, column| date::standardize_column(df, column, spec),
            );
            let transformed = report.applied_columns();
            if !transformed.is_empty() {
                metadata.applied_transformations.date_standardization =
                    Some(DateStandardizationMetadata {
                        transformed_columns: transformed,
                        target_format: spec.target_format.clone(),
                    });
            }
            steps.push(report);
        }

        if let Some(spec) = &self.specs.one_hot_encoding {
            let report = run_step(
                &mut table,
                TransformationKind::OneHotEncoding,
                &targets(tags, &spec.applies_to_tags),
                |df, column| onehot::encode_column(df, column, spec),
            );
            let mut new_columns = Vec::new();
            for (_, params) in report.applied() {
                if let AppliedParams::OneHot { new_columns: added } = params {
                    new_columns.extend(added.iter().cloned());
                }
            }
            let transformed = report.applied_columns();
            if !transformed.is_empty() {
                metadata.new_columns.extend(new_columns.iter().cloned());
                metadata.dropped_columns.extend(transformed.iter().cloned());
                metadata.applied_transformations.one_hot_encoding =
                    Some(OneHotEncodingMetadata {
                        dropped_columns: transformed.clone(),
                        transformed_columns: transformed,
                        new_columns,
                        max_categories: spec.max_categories,
                    });
            }
            steps.push(report);
        }

        if let Some(spec) = &self.specs.numeric_normalization {
            let report = run_step(
                &mut table,
                TransformationKind::NumericNormalization,
                &targets(tags, &spec.applies_to_tags),
                |df, column| normalize::normalize_column(df, column, spec),
            );
            let mut ranges = IndexMap::new();
            for (column, params) in report.applied() {
                if let AppliedParams::Normalized(range) = params {
                    ranges.insert(column.to_string(), *range);
                }
            }
            if !ranges.is_empty() {
                metadata.applied_transformations.numeric_normalization =
                    Some(NumericNormalizationMetadata {
                        transformed_columns: report.applied_columns(),
                        method: spec.method,
                        target_range: spec.target_range,
                        normalization_ranges: ranges,
                    });
            }
            steps.push(report);
        }

        metadata.skipped_columns = steps.iter().flat_map(StepReport::skipped).collect();
        TransformOutput {
            table,
            metadata,
            steps,
        }
    }
}

/// Tagged columns a step applies to, in column order.
fn targets(tags: &FieldTagAssignment, applies_to_tags: &[String]) -> Vec<String> {
    tags.iter()
        .filter(|(_, column_tags)| applies_to_any(applies_to_tags, column_tags))
        .map(|(column, _)| column.to_string())
        .collect()
}

fn run_step<F>(
    table: &mut DataFrame,
    kind: TransformationKind,
    columns: &[String],
    mut apply: F,
) -> StepReport
where
    F: FnMut(&mut DataFrame, &str) -> PolarsResult<ColumnOutcome>,
{
    let span = info_span!("transform_step", step = %kind);
    let _guard = span.enter();
    let mut report = StepReport::new(kind);
    for column in columns {
        let outcome = if table.column(column).is_err() {
            ColumnOutcome::Skipped(SkipReason::Missing)
        } else {
            apply(table, column).unwrap_or_else(|error| {
                ColumnOutcome::Skipped(SkipReason::Failed {
                    message: error.to_string(),
                })
            })
        };
        match &outcome {
            ColumnOutcome::Applied(params) => {
                debug!(column = %column, params = ?params, "column transformed");
            }
            ColumnOutcome::Skipped(reason) => {
                warn!(column = %column, reason = %reason, "column skipped");
            }
        }
        report.push(column.as_str(), outcome);
    }
    info!(
        targeted = columns.len(),
        transformed = report.applied().count(),
        "step complete"
    );
    report
}
