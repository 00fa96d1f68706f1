//! Enriched payload assembly.

use polars::prelude::{DataFrame, PolarsResult};

use tagflow_common::{column_names, row_records};
use tagflow_model::{
    EnrichedMetadata, EnrichedPayload, FieldTagAssignment, SourceMetadata, TransformationMetadata,
};
use tagflow_rules::Ruleset;

/// Keys the enriched metadata writes itself; stale copies carried in from an
/// input envelope are dropped.
const RESERVED_KEYS: &[&str] = &[
    "transformation_timestamp",
    "field_tags",
    "transformations",
    "tag_descriptions",
];

/// Build the payload handed to the forwarder.
///
/// Source fields are kept; counts and column names are replaced with those of
/// the transformed table. `transformed_at` is written as given.
pub fn assemble_payload(
    table: &DataFrame,
    mut source: SourceMetadata,
    field_tags: FieldTagAssignment,
    transformations: TransformationMetadata,
    ruleset: &Ruleset,
    transformed_at: &str,
) -> PolarsResult<EnrichedPayload> {
    source.row_count = table.height();
    source.column_count = table.width();
    source.columns = column_names(table);
    for key in RESERVED_KEYS {
        source.extra.remove(*key);
    }

    let metadata = EnrichedMetadata {
        source,
        transformation_timestamp: transformed_at.to_string(),
        field_tags,
        transformations,
        tag_descriptions: ruleset.tag_descriptions(),
    };
    Ok(EnrichedPayload {
        metadata,
        data: row_records(table)?,
    })
}
