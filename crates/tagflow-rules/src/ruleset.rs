//! Ruleset loading and validation.

use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use indexmap::IndexMap;
use tracing::{debug, warn};

use tagflow_model::{
    ColumnKind, DEFAULT_DATE_FORMAT, DEFAULT_MAX_CATEGORIES, DEFAULT_TARGET_RANGE,
    DateStandardization, NormalizationMethod, NumericNormalization, OneHotEncoding,
    SemanticTag, TransformationSpecs,
};

use crate::document::{
    DateDocument, NormalizationDocument, OneHotDocument, RulesetDocument, TagDocument,
    TransformationsDocument,
};
use crate::error::{Result, RulesetError};

/// A validated ruleset: semantic tags in declaration order plus the
/// transformation specs that reference them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ruleset {
    pub tags: Vec<SemanticTag>,
    pub transformations: TransformationSpecs,
}

impl Ruleset {
    pub fn new(tags: Vec<SemanticTag>, transformations: TransformationSpecs) -> Self {
        Self {
            tags,
            transformations,
        }
    }

    /// Load a ruleset from a `.yaml`, `.yml` or `.json` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let is_json = match ext.as_deref() {
            Some("yaml" | "yml") => false,
            Some("json") => true,
            _ => {
                return Err(RulesetError::UnsupportedExtension {
                    path: path.to_path_buf(),
                });
            }
        };
        let text = std::fs::read_to_string(path).map_err(|e| RulesetError::io(path, e))?;
        let ruleset = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        debug!(
            path = %path.display(),
            tags = ruleset.tags.len(),
            "loaded ruleset"
        );
        Ok(ruleset)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Self::from_document(RulesetDocument::default());
        }
        let document: RulesetDocument =
            serde_yaml::from_str(text).map_err(|source| RulesetError::Yaml { source })?;
        Self::from_document(document)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: RulesetDocument =
            serde_json::from_str(text).map_err(|source| RulesetError::Json { source })?;
        Self::from_document(document)
    }

    fn from_document(document: RulesetDocument) -> Result<Self> {
        let mut tags = Vec::new();
        if let Some(declared) = document.semantic_tags {
            for (name, tag) in declared.iter() {
                tags.push(build_tag(name, tag.as_ref())?);
            }
        }
        let transformations = match document.transformations {
            Some(doc) => build_transformations(doc)?,
            None => TransformationSpecs::default(),
        };
        let ruleset = Self {
            tags,
            transformations,
        };
        ruleset.warn_unknown_tag_references();
        Ok(ruleset)
    }

    pub fn tag(&self, name: &str) -> Option<&SemanticTag> {
        self.tags.iter().find(|tag| tag.name == name)
    }

    /// Descriptions of the tags that have one, in declaration order.
    pub fn tag_descriptions(&self) -> IndexMap<String, String> {
        self.tags
            .iter()
            .filter_map(|tag| {
                tag.description
                    .as_ref()
                    .map(|description| (tag.name.clone(), description.clone()))
            })
            .collect()
    }

    fn warn_unknown_tag_references(&self) {
        let specs = &self.transformations;
        let references = [
            (
                "date_standardization",
                specs
                    .date_standardization
                    .as_ref()
                    .map(|s| s.applies_to_tags.as_slice()),
            ),
            (
                "one_hot_encoding",
                specs
                    .one_hot_encoding
                    .as_ref()
                    .map(|s| s.applies_to_tags.as_slice()),
            ),
            (
                "numeric_normalization",
                specs
                    .numeric_normalization
                    .as_ref()
                    .map(|s| s.applies_to_tags.as_slice()),
            ),
        ];
        for (transformation, applies_to) in references {
            for tag in applies_to.unwrap_or(&[]) {
                if self.tag(tag).is_none() {
                    warn!(transformation, tag = %tag, "transformation references an undeclared tag");
                }
            }
        }
    }
}

fn build_tag(name: &str, doc: Option<&TagDocument>) -> Result<SemanticTag> {
    let Some(doc) = doc else {
        return Ok(SemanticTag::new(name));
    };
    let keywords: Vec<&String> = doc
        .keywords
        .iter()
        .flatten()
        .filter(|keyword| {
            let keep = !keyword.trim().is_empty();
            if !keep {
                warn!(tag = name, "ignoring empty keyword");
            }
            keep
        })
        .collect();
    let kinds = doc
        .data_types
        .iter()
        .flatten()
        .map(|kind| {
            kind.parse::<ColumnKind>()
                .map_err(|source| RulesetError::UnknownKind {
                    tag: name.to_string(),
                    source,
                })
        })
        .collect::<Result<Vec<_>>>()?;
    let mut tag = SemanticTag::new(name)
        .with_keywords(keywords)
        .with_kinds(dedup(kinds));
    if let Some(description) = &doc.description {
        tag = tag.with_description(description.clone());
    }
    Ok(tag)
}

fn dedup(kinds: Vec<ColumnKind>) -> Vec<ColumnKind> {
    let mut out: Vec<ColumnKind> = Vec::with_capacity(kinds.len());
    for kind in kinds {
        if !out.contains(&kind) {
            out.push(kind);
        }
    }
    out
}

fn build_transformations(doc: TransformationsDocument) -> Result<TransformationSpecs> {
    for key in doc.unknown.keys() {
        warn!(key = %key, "ignoring unknown transformation");
    }
    Ok(TransformationSpecs {
        date_standardization: doc.date_standardization.map(build_date).transpose()?,
        one_hot_encoding: doc.one_hot_encoding.map(build_one_hot).transpose()?,
        numeric_normalization: doc
            .numeric_normalization
            .map(build_normalization)
            .transpose()?,
    })
}

fn build_date(doc: DateDocument) -> Result<DateStandardization> {
    let target_format = doc
        .format
        .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
    validate_strftime(&target_format)?;
    Ok(DateStandardization {
        target_format,
        applies_to_tags: doc.applies_to_tags.unwrap_or_default(),
    })
}

/// Reject patterns chrono cannot format; formatting one would panic later.
fn validate_strftime(format: &str) -> Result<()> {
    let invalid = format.trim().is_empty()
        || StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
    if invalid {
        return Err(RulesetError::InvalidDateFormat {
            format: format.to_string(),
        });
    }
    Ok(())
}

fn build_one_hot(doc: OneHotDocument) -> Result<OneHotEncoding> {
    let max_categories = doc.max_categories.unwrap_or(DEFAULT_MAX_CATEGORIES);
    if max_categories == 0 {
        return Err(RulesetError::InvalidMaxCategories);
    }
    Ok(OneHotEncoding {
        applies_to_tags: doc.applies_to_tags.unwrap_or_default(),
        max_categories,
    })
}

fn build_normalization(doc: NormalizationDocument) -> Result<NumericNormalization> {
    let method = match doc.method.as_deref() {
        Some(method) => method
            .parse::<NormalizationMethod>()
            .map_err(|source| RulesetError::UnknownMethod { source })?,
        None => NormalizationMethod::default(),
    };
    let target_range = match doc.range {
        None => DEFAULT_TARGET_RANGE,
        Some(values) => match values.as_slice() {
            [lo, hi] if lo.is_finite() && hi.is_finite() => [*lo, *hi],
            _ => return Err(RulesetError::InvalidRange { found: values }),
        },
    };
    Ok(NumericNormalization {
        applies_to_tags: doc.applies_to_tags.unwrap_or_default(),
        method,
        target_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let ruleset = Ruleset::from_yaml_str(
            "transformations:\n  date_standardization: {}\n  one_hot_encoding: {}\n  numeric_normalization: {}\n",
        )
        .unwrap();
        let specs = &ruleset.transformations;
        let date = specs.date_standardization.as_ref().unwrap();
        assert_eq!(date.target_format, "%Y-%m-%d");
        assert!(date.applies_to_tags.is_empty());
        assert_eq!(specs.one_hot_encoding.as_ref().unwrap().max_categories, 20);
        let norm = specs.numeric_normalization.as_ref().unwrap();
        assert_eq!(norm.method, NormalizationMethod::MinMax);
        assert_eq!(norm.target_range, [0.0, 1.0]);
    }

    #[test]
    fn empty_document_is_an_empty_ruleset() {
        let ruleset = Ruleset::from_yaml_str("  \n").unwrap();
        assert!(ruleset.tags.is_empty());
        assert!(ruleset.transformations.is_empty());
    }

    #[test]
    fn rejects_invalid_strftime() {
        assert!(validate_strftime("%Y-%m-%d").is_ok());
        assert!(validate_strftime("%d/%m/%Y %H:%M").is_ok());
        assert!(matches!(
            validate_strftime("%Q"),
            Err(RulesetError::InvalidDateFormat { .. })
        ));
        assert!(validate_strftime("").is_err());
    }

    #[test]
    fn kinds_are_deduplicated() {
        let ruleset = Ruleset::from_yaml_str(
            "semantic_tags:\n  quantitative:\n    keywords: [amount]\n    data_types: [int, int64, float]\n",
        )
        .unwrap();
        assert_eq!(
            ruleset.tags[0].allowed_kinds,
            vec![ColumnKind::Integer, ColumnKind::Float]
        );
    }

    #[test]
    fn empty_keywords_are_dropped() {
        let ruleset = Ruleset::from_yaml_str(
            "semantic_tags:\n  id:\n    keywords: [\"\", \" \", ID]\n",
        )
        .unwrap();
        assert_eq!(ruleset.tags[0].keywords, vec!["id".to_string()]);
    }
}
