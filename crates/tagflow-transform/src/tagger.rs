//! Semantic tagging of columns.

use polars::prelude::DataFrame;
use tracing::debug;

use tagflow_model::{ColumnKind, ColumnKinds, FieldTagAssignment, SemanticTag};

/// Assigns semantic tags to columns by name keywords and inferred kind.
#[derive(Debug, Clone, Copy)]
pub struct Tagger<'a> {
    tags: &'a [SemanticTag],
}

impl<'a> Tagger<'a> {
    pub fn new(tags: &'a [SemanticTag]) -> Self {
        Self { tags }
    }

    /// Tag every column of `df`.
    ///
    /// A column gets a tag when one of the tag's keywords occurs in the column
    /// name (case-insensitive) and the tag accepts the column's kind. Tags are
    /// listed in declaration order; untagged columns get an empty list.
    pub fn tag_fields(&self, df: &DataFrame, kinds: &ColumnKinds) -> FieldTagAssignment {
        df.get_column_names()
            .into_iter()
            .map(|name| {
                let kind = kinds.get(name.as_str()).copied();
                let tags = self.tags_for(name.as_str(), kind);
                if !tags.is_empty() {
                    debug!(column = %name, tags = ?tags, "tagged column");
                }
                (name.to_string(), tags)
            })
            .collect()
    }

    /// Tags matching a single column. Without a known kind only tags that
    /// accept any kind can match.
    pub fn tags_for(&self, column: &str, kind: Option<ColumnKind>) -> Vec<String> {
        self.tags
            .iter()
            .filter(|tag| tag.matches_name(column))
            .filter(|tag| match kind {
                Some(kind) => tag.accepts_kind(kind),
                None => tag.allowed_kinds.is_empty(),
            })
            .map(|tag| tag.name.clone())
            .collect()
    }
}
