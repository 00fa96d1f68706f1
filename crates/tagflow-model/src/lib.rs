//! Core types for the tagflow pipeline.
//!
//! - **kind**: column kinds and their ruleset spellings
//! - **rules**: semantic tags and transformation specs
//! - **source**: source format and source metadata
//! - **metadata**: tag assignments, transformation records, enriched payload

pub mod error;
pub mod kind;
pub mod metadata;
pub mod rules;
pub mod source;

pub use error::{ModelError, Result};
pub use kind::ColumnKind;
pub use metadata::{
    AppliedTransformations, ColumnKinds, DateStandardizationMetadata, EnrichedMetadata,
    EnrichedPayload, FieldTagAssignment, NormalizationRange, NumericNormalizationMetadata,
    OneHotEncodingMetadata, SkippedColumn, TransformationMetadata,
};
pub use rules::{
    DEFAULT_DATE_FORMAT, DEFAULT_MAX_CATEGORIES, DEFAULT_TARGET_RANGE, DateStandardization,
    NormalizationMethod, NumericNormalization, OneHotEncoding, SemanticTag, TransformationKind,
    TransformationSpecs, applies_to_any,
};
pub use source::{SourceEnvelope, SourceFormat, SourceMetadata, TIMESTAMP_FORMAT};
