//! Per-column results of a transformation step.

use std::fmt;

use tagflow_model::{NormalizationRange, SkippedColumn, TransformationKind};

/// What a step did to one tagged column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnOutcome {
    Applied(AppliedParams),
    Skipped(SkipReason),
}

/// Parameters of an applied transformation.
#[derive(Debug, Clone, PartialEq)]
pub enum AppliedParams {
    /// Values rewritten to the target format.
    Date { target_format: String },
    /// Column replaced by one boolean column per category.
    OneHot { new_columns: Vec<String> },
    /// Values rescaled in place.
    Normalized(NormalizationRange),
}

/// Why a tagged column was left unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    UnparsableDate { value: String },
    NotDateColumn { dtype: String },
    TooManyCategories { count: usize, max: usize },
    NoValues,
    NameCollision { column: String },
    NotNumeric { dtype: String },
    ConstantColumn,
    ZeroVariance,
    TooFewValues { count: usize },
    /// An earlier step removed the column.
    Missing,
    Failed { message: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnparsableDate { value } => write!(f, "unparsable date '{value}'"),
            SkipReason::NotDateColumn { dtype } => write!(f, "not a date column ({dtype})"),
            SkipReason::TooManyCategories { count, max } => {
                write!(f, "too many categories ({count} > {max})")
            }
            SkipReason::NoValues => f.write_str("no non-null values"),
            SkipReason::NameCollision { column } => {
                write!(f, "name collision with existing column '{column}'")
            }
            SkipReason::NotNumeric { dtype } => write!(f, "not numeric ({dtype})"),
            SkipReason::ConstantColumn => f.write_str("constant column"),
            SkipReason::ZeroVariance => f.write_str("zero variance"),
            SkipReason::TooFewValues { count } => {
                write!(f, "too few values for z-score ({count})")
            }
            SkipReason::Missing => f.write_str("column no longer in table"),
            SkipReason::Failed { message } => write!(f, "failed: {message}"),
        }
    }
}

/// Outcome for one column of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnReport {
    pub column: String,
    pub outcome: ColumnOutcome,
}

/// Everything one step did, in the order columns were visited.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub kind: TransformationKind,
    pub columns: Vec<ColumnReport>,
}

impl StepReport {
    pub fn new(kind: TransformationKind) -> Self {
        Self {
            kind,
            columns: Vec::new(),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, outcome: ColumnOutcome) {
        self.columns.push(ColumnReport {
            column: column.into(),
            outcome,
        });
    }

    /// Columns the step changed, in visit order.
    pub fn applied(&self) -> impl Iterator<Item = (&str, &AppliedParams)> {
        self.columns.iter().filter_map(|report| match &report.outcome {
            ColumnOutcome::Applied(params) => Some((report.column.as_str(), params)),
            ColumnOutcome::Skipped(_) => None,
        })
    }

    pub fn applied_columns(&self) -> Vec<String> {
        self.applied().map(|(column, _)| column.to_string()).collect()
    }

    /// Skipped columns in the shape recorded in transformation metadata.
    pub fn skipped(&self) -> Vec<SkippedColumn> {
        self.columns
            .iter()
            .filter_map(|report| match &report.outcome {
                ColumnOutcome::Skipped(reason) => Some(SkippedColumn {
                    transformation: self.kind,
                    column: report.column.clone(),
                    reason: reason.to_string(),
                }),
                ColumnOutcome::Applied(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_reasons_render() {
        assert_eq!(
            SkipReason::TooManyCategories { count: 25, max: 20 }.to_string(),
            "too many categories (25 > 20)"
        );
        assert_eq!(SkipReason::ConstantColumn.to_string(), "constant column");
        assert_eq!(
            SkipReason::UnparsableDate {
                value: "soon".into()
            }
            .to_string(),
            "unparsable date 'soon'"
        );
    }

    #[test]
    fn report_splits_applied_and_skipped() {
        let mut report = StepReport::new(TransformationKind::NumericNormalization);
        report.push(
            "age",
            ColumnOutcome::Applied(AppliedParams::Normalized(NormalizationRange::ZScore {
                mean: 1.0,
                std: 1.0,
            })),
        );
        report.push("amount", ColumnOutcome::Skipped(SkipReason::ZeroVariance));
        assert_eq!(report.applied_columns(), vec!["age".to_string()]);
        let skipped = report.skipped();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].column, "amount");
        assert_eq!(skipped[0].reason, "zero variance");
        assert_eq!(
            skipped[0].transformation,
            TransformationKind::NumericNormalization
        );
    }
}
