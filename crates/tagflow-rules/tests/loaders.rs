use std::io::Write;

use tagflow_model::{ColumnKind, NormalizationMethod};
use tagflow_rules::{Ruleset, RulesetError};
use tempfile::{Builder, NamedTempFile};

const RULES_YAML: &str = r#"
semantic_tags:
  temporal:
    keywords: ["date", "_at"]
    data_types: ["string"]
    description: "Date or time field"
  category:
    keywords: ["status", "type"]
    data_types: []
  quantitative:
    keywords: ["amount", "age"]
    data_types: ["int", "float"]
    description: "Numeric measure"
transformations:
  date_standardization:
    applies_to_tags: ["temporal"]
    format: "%Y-%m-%d"
  one_hot_encoding:
    applies_to_tags: ["category"]
    max_categories: 5
  numeric_normalization:
    applies_to_tags: ["quantitative"]
    method: "z-score"
    range: [-1, 1]
  text_cleanup:
    applies_to_tags: ["category"]
"#;

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[test]
fn loads_yaml_ruleset_in_declaration_order() {
    let file = write_temp(".yaml", RULES_YAML);
    let ruleset = Ruleset::from_path(file.path()).expect("load ruleset");

    let names: Vec<&str> = ruleset.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["temporal", "category", "quantitative"]);

    let temporal = ruleset.tag("temporal").unwrap();
    assert_eq!(temporal.keywords, vec!["date", "_at"]);
    assert_eq!(temporal.allowed_kinds, vec![ColumnKind::String]);
    assert!(ruleset.tag("category").unwrap().allowed_kinds.is_empty());

    let specs = &ruleset.transformations;
    assert_eq!(specs.one_hot_encoding.as_ref().unwrap().max_categories, 5);
    let norm = specs.numeric_normalization.as_ref().unwrap();
    assert_eq!(norm.method, NormalizationMethod::ZScore);
    assert_eq!(norm.target_range, [-1.0, 1.0]);
}

#[test]
fn tag_descriptions_skip_tags_without_one() {
    let ruleset = Ruleset::from_yaml_str(RULES_YAML).unwrap();
    let descriptions = ruleset.tag_descriptions();
    let keys: Vec<&str> = descriptions.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["temporal", "quantitative"]);
    assert_eq!(
        descriptions.get("quantitative").map(String::as_str),
        Some("Numeric measure")
    );
}

#[test]
fn loads_json_ruleset() {
    let json = r#"{
        "semantic_tags": {
            "identifier": {"keywords": ["ID"], "data_types": ["int"]}
        },
        "transformations": {
            "one_hot_encoding": {"applies_to_tags": ["identifier"]}
        }
    }"#;
    let file = write_temp(".json", json);
    let ruleset = Ruleset::from_path(file.path()).unwrap();
    assert_eq!(ruleset.tags[0].keywords, vec!["id"]);
    assert_eq!(
        ruleset
            .transformations
            .one_hot_encoding
            .as_ref()
            .unwrap()
            .max_categories,
        20
    );
    assert!(ruleset.transformations.date_standardization.is_none());
}

#[test]
fn unknown_kind_is_a_config_error() {
    let err = Ruleset::from_yaml_str(
        "semantic_tags:\n  weird:\n    keywords: [x]\n    data_types: [complex]\n",
    )
    .unwrap_err();
    assert!(matches!(err, RulesetError::UnknownKind { ref tag, .. } if tag == "weird"));
    assert!(err.to_string().contains("complex"));
}

#[test]
fn unknown_method_is_a_config_error() {
    let err = Ruleset::from_yaml_str(
        "transformations:\n  numeric_normalization:\n    method: robust\n",
    )
    .unwrap_err();
    assert!(matches!(err, RulesetError::UnknownMethod { .. }));
}

#[test]
fn range_must_have_two_values() {
    let err = Ruleset::from_yaml_str(
        "transformations:\n  numeric_normalization:\n    range: [0, 1, 2]\n",
    )
    .unwrap_err();
    assert!(matches!(err, RulesetError::InvalidRange { ref found } if found.len() == 3));
}

#[test]
fn zero_max_categories_is_rejected() {
    let err = Ruleset::from_yaml_str(
        "transformations:\n  one_hot_encoding:\n    max_categories: 0\n",
    )
    .unwrap_err();
    assert!(matches!(err, RulesetError::InvalidMaxCategories));
}

#[test]
fn malformed_yaml_is_a_config_error() {
    let err = Ruleset::from_yaml_str("semantic_tags: [unclosed").unwrap_err();
    assert!(matches!(err, RulesetError::Yaml { .. }));
}

#[test]
fn unsupported_extension_is_rejected() {
    let file = write_temp(".txt", RULES_YAML);
    let err = Ruleset::from_path(file.path()).unwrap_err();
    assert!(matches!(err, RulesetError::UnsupportedExtension { .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Ruleset::from_path(&dir.path().join("tags.yaml")).unwrap_err();
    assert!(matches!(err, RulesetError::Io { .. }));
}
