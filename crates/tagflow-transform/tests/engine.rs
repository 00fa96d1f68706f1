//! End-to-end engine runs.

use polars::prelude::*;
use tagflow_model::{NormalizationRange, SourceFormat, SourceMetadata, TransformationKind};
use tagflow_rules::Ruleset;
use tagflow_transform::{ColumnOutcome, Engine, EngineError, SkipReason};

const NOW: &str = "2025-03-01T12:00:00.000000";

fn source(df: &DataFrame) -> SourceMetadata {
    SourceMetadata::new(
        "customers.csv",
        "2025-03-01T11:59:00.000000",
        SourceFormat::Csv,
        df.height(),
        df.get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect(),
    )
}

fn engine(yaml: &str) -> Engine {
    Engine::new(Ruleset::from_yaml_str(yaml).expect("ruleset"))
}

#[test]
fn standardizes_text_dates() {
    let engine = engine(
        r#"
semantic_tags:
  temporal:
    keywords: ["date", "_at"]
    data_types: ["string"]
transformations:
  date_standardization:
    applies_to_tags: ["temporal"]
    format: "%Y-%m-%d"
"#,
    );
    let df = DataFrame::new(vec![
        Series::new("signup_date".into(), vec!["01/15/2025", "02/20/2025"]).into(),
    ])
    .unwrap();

    let run = engine.run(&df, source(&df), NOW).unwrap();

    let col = run.table.column("signup_date").unwrap().str().unwrap();
    assert_eq!(col.get(0), Some("2025-01-15"));
    assert_eq!(col.get(1), Some("2025-02-20"));
    let applied = &run.payload.metadata.transformations.applied_transformations;
    let date = applied.date_standardization.as_ref().unwrap();
    assert_eq!(date.transformed_columns, vec!["signup_date"]);
    assert_eq!(date.target_format, "%Y-%m-%d");
    assert_eq!(
        run.payload.metadata.field_tags.tags_for("signup_date"),
        ["temporal".to_string()]
    );
}

#[test]
fn one_hot_encodes_low_cardinality_columns() {
    let engine = engine(
        r#"
semantic_tags:
  category:
    keywords: ["status"]
    data_types: []
transformations:
  one_hot_encoding:
    applies_to_tags: ["category"]
    max_categories: 5
"#,
    );
    let df = DataFrame::new(vec![
        Series::new("id".into(), vec![1i64, 2, 3]).into(),
        Series::new("status".into(), vec!["active", "active", "inactive"]).into(),
    ])
    .unwrap();

    let run = engine.run(&df, source(&df), NOW).unwrap();

    assert!(run.table.column("status").is_err());
    assert_eq!(run.table.height(), 3);
    let names: Vec<String> = run
        .table
        .get_column_names()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["id", "status_active", "status_inactive"]);
    let active = run.table.column("status_active").unwrap().bool().unwrap();
    let inactive = run.table.column("status_inactive").unwrap().bool().unwrap();
    assert_eq!(
        active.into_iter().collect::<Vec<_>>(),
        vec![Some(true), Some(true), Some(false)]
    );
    assert_eq!(
        inactive.into_iter().collect::<Vec<_>>(),
        vec![Some(false), Some(false), Some(true)]
    );

    let meta = &run.payload.metadata;
    assert_eq!(meta.transformations.new_columns, vec!["status_active", "status_inactive"]);
    assert_eq!(meta.transformations.dropped_columns, vec!["status"]);
    assert_eq!(meta.source.column_count, 3);
    assert_eq!(meta.source.columns, names);
}

#[test]
fn one_hot_skips_high_cardinality_columns() {
    let engine = engine(
        r#"
semantic_tags:
  category:
    keywords: ["status"]
transformations:
  one_hot_encoding:
    applies_to_tags: ["category"]
    max_categories: 2
"#,
    );
    let df = DataFrame::new(vec![
        Series::new("status".into(), vec!["a", "b", "c", "a"]).into(),
    ])
    .unwrap();

    let run = engine.run(&df, source(&df), NOW).unwrap();

    assert!(run.table.equals(&df));
    let meta = &run.payload.metadata.transformations;
    assert!(meta.new_columns.is_empty());
    assert!(meta.dropped_columns.is_empty());
    assert!(meta.applied_transformations.one_hot_encoding.is_none());
    assert_eq!(meta.skipped_columns.len(), 1);
    assert_eq!(meta.skipped_columns[0].column, "status");
    assert_eq!(
        meta.skipped_columns[0].transformation,
        TransformationKind::OneHotEncoding
    );
    assert_eq!(
        run.steps[0].columns[0].outcome,
        ColumnOutcome::Skipped(SkipReason::TooManyCategories { count: 3, max: 2 })
    );
}

#[test]
fn encoded_columns_are_skipped_by_normalization() {
    let engine = engine(
        r#"
semantic_tags:
  category:
    keywords: ["level", "city"]
  quantitative:
    keywords: ["level"]
    data_types: ["int"]
transformations:
  one_hot_encoding:
    applies_to_tags: ["category"]
    max_categories: 3
  numeric_normalization:
    applies_to_tags: ["quantitative"]
"#,
    );
    let df = DataFrame::new(vec![
        Series::new("level".into(), vec![1i64, 2, 1, 3]).into(),
        Series::new("city".into(), vec!["Oslo", "Bergen", "Moss", "Bodo"]).into(),
    ])
    .unwrap();

    let run = engine.run(&df, source(&df), NOW).unwrap();

    let tags = &run.payload.metadata.field_tags;
    assert_eq!(
        tags.tags_for("level"),
        ["category".to_string(), "quantitative".to_string()]
    );
    assert!(run.table.column("level").is_err());
    assert!(run.table.column("level_1").is_ok());
    assert!(run.table.column("city").is_ok());

    let meta = &run.payload.metadata.transformations;
    assert!(meta.applied_transformations.numeric_normalization.is_none());
    let skipped: Vec<(TransformationKind, &str, &str)> = meta
        .skipped_columns
        .iter()
        .map(|s| (s.transformation, s.column.as_str(), s.reason.as_str()))
        .collect();
    assert_eq!(
        skipped,
        vec![
            (
                TransformationKind::OneHotEncoding,
                "city",
                "too many categories (4 > 3)"
            ),
            (
                TransformationKind::NumericNormalization,
                "level",
                "column no longer in table"
            ),
        ]
    );
    assert_eq!(
        run.steps[1].columns[0].outcome,
        ColumnOutcome::Skipped(SkipReason::Missing)
    );
}

#[test]
fn one_hot_nulls_are_false_everywhere() {
    let engine = engine(
        r#"
semantic_tags:
  category:
    keywords: ["type"]
transformations:
  one_hot_encoding:
    applies_to_tags: ["category"]
"#,
    );
    let df = DataFrame::new(vec![
        Series::new("type".into(), vec![Some("x"), None, Some("y")]).into(),
    ])
    .unwrap();

    let run = engine.run(&df, source(&df), NOW).unwrap();

    let x = run.table.column("type_x").unwrap().bool().unwrap();
    assert_eq!(x.get(1), Some(false));
    let y = run.table.column("type_y").unwrap().bool().unwrap();
    assert_eq!(y.get(1), Some(false));
    assert_eq!(run.table.width(), 2);
}

#[test]
fn min_max_normalizes_integer_columns() {
    let engine = engine(
        r#"
semantic_tags:
  quantitative:
    keywords: ["amount", "age"]
    data_types: ["int", "float"]
transformations:
  numeric_normalization:
    applies_to_tags: ["quantitative"]
    method: "min-max"
    range: [0, 1]
"#,
    );
    let df = DataFrame::new(vec![Series::new("age".into(), vec![20i64, 30, 40]).into()]).unwrap();

    let run = engine.run(&df, source(&df), NOW).unwrap();

    let age = run.table.column("age").unwrap().f64().unwrap();
    assert_eq!(
        age.into_iter().collect::<Vec<_>>(),
        vec![Some(0.0), Some(0.5), Some(1.0)]
    );
    let norm = run
        .payload
        .metadata
        .transformations
        .applied_transformations
        .numeric_normalization
        .as_ref()
        .unwrap();
    assert_eq!(
        norm.normalization_ranges.get("age"),
        Some(&NormalizationRange::MinMax {
            original_range: [20.0, 40.0],
            target_range: [0.0, 1.0],
        })
    );
}

#[test]
fn constant_columns_are_not_normalized() {
    let engine = engine(
        r#"
semantic_tags:
  quantitative:
    keywords: ["amount"]
    data_types: ["int", "float"]
transformations:
  numeric_normalization:
    applies_to_tags: ["quantitative"]
"#,
    );
    let df = DataFrame::new(vec![
        Series::new("amount".into(), vec![7.5f64, 7.5, 7.5]).into(),
        Series::new("amount_due".into(), vec![1.0f64, 2.0, 3.0]).into(),
    ])
    .unwrap();

    let run = engine.run(&df, source(&df), NOW).unwrap();

    let amount = run.table.column("amount").unwrap().f64().unwrap();
    assert_eq!(amount.get(0), Some(7.5));
    let norm = run
        .payload
        .metadata
        .transformations
        .applied_transformations
        .numeric_normalization
        .as_ref()
        .unwrap();
    assert!(norm.normalization_ranges.get("amount").is_none());
    assert!(norm.normalization_ranges.get("amount_due").is_some());
    assert_eq!(norm.transformed_columns, vec!["amount_due"]);
}

#[test]
fn z_score_has_zero_mean_and_unit_sample_std() {
    let engine = engine(
        r#"
semantic_tags:
  quantitative:
    keywords: ["amount"]
transformations:
  numeric_normalization:
    applies_to_tags: ["quantitative"]
    method: "z-score"
"#,
    );
    let df = DataFrame::new(vec![
        Series::new("amount".into(), vec![3.0f64, 9.0, 4.5, 12.0, 0.5]).into(),
    ])
    .unwrap();

    let run = engine.run(&df, source(&df), NOW).unwrap();

    let values: Vec<f64> = run
        .table
        .column("amount")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .flatten()
        .collect();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    assert!(mean.abs() < 1e-9);
    assert!((var.sqrt() - 1.0).abs() < 1e-9);
}

#[test]
fn unparsable_dates_leave_column_unchanged() {
    let engine = engine(
        r#"
semantic_tags:
  temporal:
    keywords: ["date"]
transformations:
  date_standardization:
    applies_to_tags: ["temporal"]
"#,
    );
    let df = DataFrame::new(vec![
        Series::new("due_date".into(), vec!["2025-01-15", "next tuesday"]).into(),
    ])
    .unwrap();

    let run = engine.run(&df, source(&df), NOW).unwrap();

    assert!(run.table.equals(&df));
    let meta = &run.payload.metadata.transformations;
    assert!(meta.applied_transformations.date_standardization.is_none());
    assert_eq!(meta.skipped_columns[0].column, "due_date");
    assert_eq!(meta.skipped_columns[0].reason, "unparsable date 'next tuesday'");
}

#[test]
fn untagged_columns_pass_through() {
    let engine = engine(
        r#"
semantic_tags:
  quantitative:
    keywords: ["amount"]
    data_types: ["float"]
transformations:
  numeric_normalization:
    applies_to_tags: ["quantitative"]
"#,
    );
    let df = DataFrame::new(vec![
        Series::new("name".into(), vec!["a", "b"]).into(),
        // Integer kind is not allowed by the tag
        Series::new("amount".into(), vec![1i64, 2]).into(),
    ])
    .unwrap();

    let run = engine.run(&df, source(&df), NOW).unwrap();

    assert!(run.table.equals(&df));
    let tags = &run.payload.metadata.field_tags;
    assert!(tags.tags_for("name").is_empty());
    assert!(tags.tags_for("amount").is_empty());
    assert_eq!(tags.len(), 2);
}

#[test]
fn payload_serializes_source_fields_and_rows() {
    let engine = engine(
        r#"
semantic_tags:
  category:
    keywords: ["status"]
    description: "Categorical field"
transformations:
  one_hot_encoding:
    applies_to_tags: ["category"]
"#,
    );
    let df = DataFrame::new(vec![
        Series::new("status".into(), vec!["on", "off"]).into(),
    ])
    .unwrap();

    let run = engine.run(&df, source(&df), NOW).unwrap();
    let value = serde_json::to_value(&run.payload).unwrap();

    let meta = &value["metadata"];
    assert_eq!(meta["filename"], "customers.csv");
    assert_eq!(meta["source_format"], "csv");
    assert_eq!(meta["transformation_timestamp"], NOW);
    assert_eq!(meta["row_count"], 2);
    assert_eq!(meta["columns"][0], "status_off");
    assert_eq!(meta["tag_descriptions"]["category"], "Categorical field");
    assert_eq!(
        meta["transformations"]["applied_transformations"]["one_hot_encoding"]["max_categories"],
        20
    );
    assert_eq!(value["data"][0]["status_on"], true);
    assert_eq!(value["data"][0]["status_off"], false);
}

#[test]
fn empty_tables_are_rejected() {
    let engine = engine("semantic_tags: {}\n");
    let no_rows = DataFrame::new(vec![Series::new("a".into(), Vec::<i64>::new()).into()]).unwrap();
    let err = engine.run(&no_rows, source(&no_rows), NOW).unwrap_err();
    assert!(matches!(err, EngineError::EmptyInput { columns: 1, rows: 0 }));

    let no_columns = DataFrame::empty();
    let err = engine
        .run(&no_columns, source(&no_columns), NOW)
        .unwrap_err();
    assert!(matches!(err, EngineError::EmptyInput { columns: 0, .. }));
}
