//! One engine run: inspect, tag, transform, assemble.

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use tagflow_model::{ColumnKinds, EnrichedPayload, SourceMetadata};
use tagflow_rules::Ruleset;

use crate::assemble::assemble_payload;
use crate::error::{EngineError, Result};
use crate::inspect::inspect_kinds_with_samples;
use crate::tagger::Tagger;
use crate::transform::{StepReport, Transformer};

/// Everything produced by [`Engine::run`].
#[derive(Debug, Clone)]
pub struct EngineRun {
    pub payload: EnrichedPayload,
    /// The transformed table the payload rows were built from.
    pub table: DataFrame,
    /// Kinds inferred from the input table.
    pub kinds: ColumnKinds,
    pub steps: Vec<StepReport>,
}

/// Tagging and transformation engine bound to one ruleset.
#[derive(Debug, Clone)]
pub struct Engine {
    ruleset: Ruleset,
}

impl Engine {
    pub fn new(ruleset: Ruleset) -> Self {
        Self { ruleset }
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// Run the engine over one table.
    ///
    /// `transformed_at` becomes the payload's `transformation_timestamp`.
    pub fn run(
        &self,
        table: &DataFrame,
        source: SourceMetadata,
        transformed_at: &str,
    ) -> Result<EngineRun> {
        self.run_with_samples(table, source, &ColumnKinds::default(), transformed_at)
    }

    /// Run the engine with first-value kinds recorded by the loader.
    ///
    /// Columns in `samples` are tagged by that kind instead of the one read
    /// from the table.
    pub fn run_with_samples(
        &self,
        table: &DataFrame,
        source: SourceMetadata,
        samples: &ColumnKinds,
        transformed_at: &str,
    ) -> Result<EngineRun> {
        let span = info_span!("engine_run", file = %source.filename);
        let _guard = span.enter();

        if table.width() == 0 || table.height() == 0 {
            return Err(EngineError::EmptyInput {
                columns: table.width(),
                rows: table.height(),
            });
        }

        let kinds = inspect_kinds_with_samples(table, samples);
        let field_tags = Tagger::new(&self.ruleset.tags).tag_fields(table, &kinds);
        info!(
            columns = field_tags.len(),
            tagged = field_tags.tagged_count(),
            "tagged columns"
        );

        let output = Transformer::new(&self.ruleset.transformations)
            .transform(table.clone(), &field_tags);
        info!(
            new_columns = output.metadata.new_columns.len(),
            dropped_columns = output.metadata.dropped_columns.len(),
            skipped_columns = output.metadata.skipped_columns.len(),
            "applied transformations"
        );

        let payload = assemble_payload(
            &output.table,
            source,
            field_tags,
            output.metadata,
            &self.ruleset,
            transformed_at,
        )?;
        Ok(EngineRun {
            payload,
            table: output.table,
            kinds,
            steps: output.steps,
        })
    }
}
