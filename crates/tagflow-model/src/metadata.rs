//! Tag assignments and transformation metadata.
//!
//! Together, [`FieldTagAssignment`] and [`TransformationMetadata`] record which
//! rule fired on which column, and which transformations changed what. They
//! are serialized verbatim into the enriched payload and summarized into the
//! audit log.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::kind::ColumnKind;
use crate::rules::{NormalizationMethod, TransformationKind};
use crate::source::SourceMetadata;

/// Inferred kind per column, in table column order.
pub type ColumnKinds = IndexMap<String, ColumnKind>;

/// Tags assigned to each column, in table column order.
///
/// Every column of the tagged table has an entry; untagged columns map to an
/// empty list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTagAssignment(IndexMap<String, Vec<String>>);

impl FieldTagAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, tags: Vec<String>) {
        self.0.insert(column.into(), tags);
    }

    /// Tags for a column; empty for untagged or unknown columns.
    pub fn tags_for(&self, column: &str) -> &[String] {
        self.0.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(column, tags)| (column.as_str(), tags.as_slice()))
    }

    /// Columns carrying at least one tag, with their tags.
    pub fn tagged(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.iter().filter(|(_, tags)| !tags.is_empty())
    }

    pub fn tagged_count(&self) -> usize {
        self.tagged().count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for FieldTagAssignment {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(column, tags)| (column.into(), tags))
                .collect(),
        )
    }
}

/// Date standardization record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateStandardizationMetadata {
    pub transformed_columns: Vec<String>,
    pub target_format: String,
}

/// One-hot encoding record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncodingMetadata {
    pub transformed_columns: Vec<String>,
    pub new_columns: Vec<String>,
    pub dropped_columns: Vec<String>,
    pub max_categories: usize,
}

/// Parameters used to normalize one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizationRange {
    MinMax {
        original_range: [f64; 2],
        target_range: [f64; 2],
    },
    ZScore {
        mean: f64,
        std: f64,
    },
}

/// Numeric normalization record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericNormalizationMetadata {
    pub transformed_columns: Vec<String>,
    pub method: NormalizationMethod,
    pub target_range: [f64; 2],
    pub normalization_ranges: IndexMap<String, NormalizationRange>,
}

/// Records for the transformations that changed at least one column.
///
/// A kind that transformed nothing is `None` and omitted from the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppliedTransformations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_standardization: Option<DateStandardizationMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_hot_encoding: Option<OneHotEncodingMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_normalization: Option<NumericNormalizationMetadata>,
}

impl AppliedTransformations {
    /// Transformed columns per applied kind, in application order.
    pub fn transformed_columns(&self) -> Vec<(TransformationKind, &[String])> {
        let mut out = Vec::new();
        if let Some(meta) = &self.date_standardization {
            out.push((
                TransformationKind::DateStandardization,
                meta.transformed_columns.as_slice(),
            ));
        }
        if let Some(meta) = &self.one_hot_encoding {
            out.push((
                TransformationKind::OneHotEncoding,
                meta.transformed_columns.as_slice(),
            ));
        }
        if let Some(meta) = &self.numeric_normalization {
            out.push((
                TransformationKind::NumericNormalization,
                meta.transformed_columns.as_slice(),
            ));
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.date_standardization.is_none()
            && self.one_hot_encoding.is_none()
            && self.numeric_normalization.is_none()
    }
}

/// A tagged column that a transformation left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedColumn {
    pub transformation: TransformationKind,
    pub column: String,
    pub reason: String,
}

/// Everything the transformer did during one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformationMetadata {
    pub applied_transformations: AppliedTransformations,
    #[serde(default)]
    pub new_columns: Vec<String>,
    #[serde(default)]
    pub dropped_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_columns: Vec<SkippedColumn>,
}

/// Metadata block of the enriched payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMetadata {
    /// Source fields, with counts and columns describing the transformed table.
    #[serde(flatten)]
    pub source: SourceMetadata,
    pub transformation_timestamp: String,
    pub field_tags: FieldTagAssignment,
    pub transformations: TransformationMetadata,
    pub tag_descriptions: IndexMap<String, String>,
}

/// The document handed to the forwarder: metadata plus row records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPayload {
    pub metadata: EnrichedMetadata,
    pub data: Vec<Map<String, Value>>,
}
