//! Tests for tagflow-model types.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tagflow_model::{
    AppliedTransformations, EnrichedMetadata, EnrichedPayload, FieldTagAssignment,
    OneHotEncodingMetadata, SourceFormat, SourceMetadata, TransformationKind,
    TransformationMetadata,
};

fn source() -> SourceMetadata {
    SourceMetadata::new(
        "customers.csv",
        "2025-01-01T00:00:00",
        SourceFormat::Csv,
        3,
        vec!["status".to_string()],
    )
}

#[test]
fn enriched_metadata_flattens_source_fields() {
    let mut tags = FieldTagAssignment::new();
    tags.insert("status", vec!["category".to_string()]);
    let mut descriptions = IndexMap::new();
    descriptions.insert("category".to_string(), "Categorical field".to_string());

    let metadata = EnrichedMetadata {
        source: source(),
        transformation_timestamp: "2025-01-02T00:00:00".to_string(),
        field_tags: tags,
        transformations: TransformationMetadata::default(),
        tag_descriptions: descriptions,
    };
    let payload = EnrichedPayload {
        metadata,
        data: vec![Map::new()],
    };

    let value = serde_json::to_value(&payload).unwrap();
    let meta = &value["metadata"];
    assert_eq!(meta["filename"], "customers.csv");
    assert_eq!(meta["source_format"], "csv");
    assert_eq!(meta["row_count"], 3);
    assert_eq!(meta["field_tags"]["status"][0], "category");
    assert_eq!(meta["tag_descriptions"]["category"], "Categorical field");
    assert_eq!(
        meta["transformations"]["applied_transformations"],
        Value::Object(Map::new())
    );
}

#[test]
fn transformed_columns_follow_application_order() {
    let applied = AppliedTransformations {
        one_hot_encoding: Some(OneHotEncodingMetadata {
            transformed_columns: vec!["status".into()],
            new_columns: vec!["status_active".into(), "status_inactive".into()],
            dropped_columns: vec!["status".into()],
            max_categories: 5,
        }),
        ..AppliedTransformations::default()
    };
    let entries = applied.transformed_columns();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, TransformationKind::OneHotEncoding);
    assert_eq!(entries[0].1, ["status".to_string()]);
}
