//! Declarative rule types: semantic tags and transformation specs.
//!
//! These are the parsed, validated form of a ruleset document. Parsing and
//! validation live in `tagflow-rules`; the types are shared here so the
//! engine and the output stage can use them without depending on the loader.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::kind::ColumnKind;

/// Default strftime pattern for date standardization.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default cardinality limit for one-hot encoding.
pub const DEFAULT_MAX_CATEGORIES: usize = 20;

/// Default min-max target range.
pub const DEFAULT_TARGET_RANGE: [f64; 2] = [0.0, 1.0];

/// A named classification rule for columns.
///
/// A column carries the tag when one of the keywords occurs in its name
/// (case-insensitive substring) and its kind is allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticTag {
    pub name: String,
    /// Keywords, stored lowercased.
    pub keywords: Vec<String>,
    /// Allowed kinds; empty means any kind.
    pub allowed_kinds: Vec<ColumnKind>,
    pub description: Option<String>,
}

impl SemanticTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: Vec::new(),
            allowed_kinds: Vec::new(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .collect();
        self
    }

    #[must_use]
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = ColumnKind>) -> Self {
        self.allowed_kinds = kinds.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when any keyword is a substring of the lowercased column name.
    pub fn matches_name(&self, column: &str) -> bool {
        let lowered = column.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }

    /// True when the tag accepts columns of this kind.
    pub fn accepts_kind(&self, kind: ColumnKind) -> bool {
        self.allowed_kinds.is_empty() || self.allowed_kinds.contains(&kind)
    }
}

/// Returns true when any of a column's tags is listed in `applies_to_tags`.
pub fn applies_to_any(applies_to_tags: &[String], column_tags: &[String]) -> bool {
    column_tags.iter().any(|tag| applies_to_tags.contains(tag))
}

/// Reformat date-like columns to a single strftime pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateStandardization {
    pub target_format: String,
    pub applies_to_tags: Vec<String>,
}

/// Replace low-cardinality columns with one boolean column per value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoding {
    pub applies_to_tags: Vec<String>,
    pub max_categories: usize,
}

/// Rescale numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericNormalization {
    pub applies_to_tags: Vec<String>,
    pub method: NormalizationMethod,
    /// Only used by [`NormalizationMethod::MinMax`].
    pub target_range: [f64; 2],
}

/// Numeric normalization method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NormalizationMethod {
    #[default]
    #[serde(rename = "min-max")]
    MinMax,
    #[serde(rename = "z-score")]
    ZScore,
}

impl NormalizationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationMethod::MinMax => "min-max",
            NormalizationMethod::ZScore => "z-score",
        }
    }
}

impl fmt::Display for NormalizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalizationMethod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min-max" | "minmax" | "min_max" => Ok(NormalizationMethod::MinMax),
            "z-score" | "zscore" | "z_score" => Ok(NormalizationMethod::ZScore),
            _ => Err(ModelError::UnknownMethod(s.trim().to_string())),
        }
    }
}

/// The transformation section of a ruleset. Each kind is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformationSpecs {
    pub date_standardization: Option<DateStandardization>,
    pub one_hot_encoding: Option<OneHotEncoding>,
    pub numeric_normalization: Option<NumericNormalization>,
}

impl TransformationSpecs {
    pub fn is_empty(&self) -> bool {
        self.date_standardization.is_none()
            && self.one_hot_encoding.is_none()
            && self.numeric_normalization.is_none()
    }
}

/// The three transformation kinds, in the order the engine applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationKind {
    DateStandardization,
    OneHotEncoding,
    NumericNormalization,
}

impl TransformationKind {
    pub const ALL: [TransformationKind; 3] = [
        TransformationKind::DateStandardization,
        TransformationKind::OneHotEncoding,
        TransformationKind::NumericNormalization,
    ];

    /// The key used in ruleset documents and in metadata output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformationKind::DateStandardization => "date_standardization",
            TransformationKind::OneHotEncoding => "one_hot_encoding",
            TransformationKind::NumericNormalization => "numeric_normalization",
        }
    }
}

impl fmt::Display for TransformationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
