//! Serde shape of a ruleset document, before validation.
//!
//! YAML and JSON rulesets share this shape. Everything is optional here so
//! that missing sections fall back to defaults during validation.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::IgnoredAny;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RulesetDocument {
    #[serde(default)]
    pub semantic_tags: Option<IndexMap<String, Option<TagDocument>>>,
    #[serde(default)]
    pub transformations: Option<TransformationsDocument>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TagDocument {
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub data_types: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TransformationsDocument {
    #[serde(default)]
    pub date_standardization: Option<DateDocument>,
    #[serde(default)]
    pub one_hot_encoding: Option<OneHotDocument>,
    #[serde(default)]
    pub numeric_normalization: Option<NormalizationDocument>,
    /// Keys this version does not know; reported and ignored.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, IgnoredAny>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DateDocument {
    #[serde(default)]
    pub applies_to_tags: Option<Vec<String>>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OneHotDocument {
    #[serde(default)]
    pub applies_to_tags: Option<Vec<String>>,
    #[serde(default)]
    pub max_categories: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct NormalizationDocument {
    #[serde(default)]
    pub applies_to_tags: Option<Vec<String>>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub range: Option<Vec<f64>>,
}
