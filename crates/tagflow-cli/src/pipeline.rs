//! Pipeline stages with explicit inputs.
//!
//! 1. **Route**: copy uploaded files into the folder layout
//! 2. **Extract**: raw CSV/JSON to `{metadata, data}` envelopes in the
//!    processed directory
//! 3. **Transform**: tag and transform each processed file, forward the
//!    enriched payload and append an audit row
//!
//! Each stage takes the paths it needs from a [`PipelineConfig`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info, info_span};

use tagflow_ingest::{
    PipelineConfig, RouteSummary, Router, extract_file, list_data_files, load_file,
};
use tagflow_model::TIMESTAMP_FORMAT;
use tagflow_output::{AuditLog, AuditRecord, forward_payload, write_json};
use tagflow_rules::Ruleset;
use tagflow_transform::Engine;

use crate::types::{BatchResult, FileResult, file_name};

/// Current local time in the pipeline's timestamp format.
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

// ============================================================================
// Stage 1: Route
// ============================================================================

/// Route files and directories. Directories are walked recursively.
pub fn route_paths(config: &PipelineConfig, paths: &[PathBuf]) -> Result<RouteSummary> {
    let router = Router::new(config.router_config());
    let mut summary = RouteSummary::default();
    for path in paths {
        let part = if path.is_dir() {
            router.route_directory(path)
        } else {
            router.route_files(std::slice::from_ref(path))
        }
        .with_context(|| format!("route {}", path.display()))?;
        summary.outcomes.extend(part.outcomes);
    }
    Ok(summary)
}

// ============================================================================
// Stage 2: Extract
// ============================================================================

/// Extract the given files, or every CSV/JSON file in the raw directory when
/// `files` is empty.
pub fn extract_files(config: &PipelineConfig, files: &[PathBuf]) -> Result<BatchResult> {
    let files = files_or_dir(files, &config.raw_dir)?;
    let mut batch = BatchResult::default();
    for path in &files {
        batch.files.push(extract_one(config, path));
    }
    info!(
        succeeded = batch.succeeded(),
        total = batch.total(),
        "Extraction complete"
    );
    Ok(batch)
}

/// Extract one file into the processed directory. Failures are reported in
/// the result.
pub fn extract_one(config: &PipelineConfig, path: &Path) -> FileResult {
    let span = info_span!("extract", file = %path.display());
    let _guard = span.enter();
    let filename = file_name(path);

    let attempt = || -> Result<FileResult> {
        let source = extract_file(path, &now_timestamp())?;
        let envelope = source.to_envelope()?;
        let output = write_json(&envelope, &filename, &config.processed_dir)?;
        Ok(FileResult {
            path: path.to_path_buf(),
            filename: filename.clone(),
            rows: source.table.height(),
            columns: source.table.width(),
            tagged_columns: 0,
            transformations: Vec::new(),
            output: Some(output),
            error: None,
        })
    };

    match attempt() {
        Ok(result) => {
            info!(output = ?result.output, "File extracted");
            result
        }
        Err(err) => {
            error!("Error extracting {}: {err:#}", path.display());
            FileResult::failed(path, format!("{err:#}"))
        }
    }
}

// ============================================================================
// Stage 3: Transform
// ============================================================================

/// Tags, transforms, forwards and audits processed files.
#[derive(Debug, Clone)]
pub struct TransformStage {
    engine: Engine,
    audit: AuditLog,
    enriched_dir: PathBuf,
    processed_dir: PathBuf,
}

impl TransformStage {
    /// Load the ruleset named by `config`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let ruleset = Ruleset::from_path(&config.ruleset_path)
            .with_context(|| format!("load ruleset {}", config.ruleset_path.display()))?;
        Ok(Self::with_ruleset(config, ruleset))
    }

    pub fn with_ruleset(config: &PipelineConfig, ruleset: Ruleset) -> Self {
        Self {
            engine: Engine::new(ruleset),
            audit: AuditLog::new(config.audit_log_path.clone()),
            enriched_dir: config.enriched_dir.clone(),
            processed_dir: config.processed_dir.clone(),
        }
    }

    pub fn ruleset(&self) -> &Ruleset {
        self.engine.ruleset()
    }

    /// Process the given files, or every CSV/JSON file in the processed
    /// directory when `files` is empty.
    pub fn run(&self, files: &[PathBuf]) -> Result<BatchResult> {
        let files = files_or_dir(files, &self.processed_dir)?;
        self.audit.initialize()?;
        if files.is_empty() {
            info!(dir = %self.processed_dir.display(), "No CSV or JSON files found");
        }

        let mut batch = BatchResult::default();
        for path in &files {
            batch.files.push(self.process_file(path));
        }
        info!(
            "Processing complete. {}/{} files processed successfully.",
            batch.succeeded(),
            batch.total()
        );
        Ok(batch)
    }

    /// Load, transform, forward and audit one file.
    ///
    /// Any failure is logged, written to the audit log as an `error:` row and
    /// returned in the result.
    pub fn process_file(&self, path: &Path) -> FileResult {
        let span = info_span!("transform", file = %path.display());
        let _guard = span.enter();
        let now = now_timestamp();

        match self.try_process(path, &now) {
            Ok(result) => {
                info!(output = ?result.output, "File processed successfully");
                result
            }
            Err(err) => {
                let message = format!("{err:#}");
                error!("Error processing file {}: {message}", path.display());
                let record = AuditRecord::failure(now, file_name(path), &message);
                if let Err(log_err) = self.audit.append(&record) {
                    error!("Error logging transformation: {log_err:#}");
                }
                FileResult::failed(path, message)
            }
        }
    }

    fn try_process(&self, path: &Path, now: &str) -> Result<FileResult> {
        let filename = file_name(path);
        let loaded = load_file(path, now)?;
        let (input_rows, input_columns) = (loaded.table.height(), loaded.table.width());
        let source_format = loaded.metadata.source_format;

        let run = self.engine.run_with_samples(
            &loaded.table,
            loaded.metadata,
            &loaded.value_kinds,
            now,
        )?;
        let output = forward_payload(&run.payload, &filename, &self.enriched_dir)?;

        let meta = &run.payload.metadata;
        let applied = &meta.transformations.applied_transformations;
        self.audit.append(&AuditRecord::success(
            now,
            filename.clone(),
            source_format,
            input_rows,
            input_columns,
            &meta.field_tags,
            applied,
            &output,
        ))?;

        Ok(FileResult {
            path: path.to_path_buf(),
            filename,
            rows: run.table.height(),
            columns: run.table.width(),
            tagged_columns: meta.field_tags.tagged_count(),
            transformations: applied
                .transformed_columns()
                .into_iter()
                .map(|(kind, columns)| format!("{kind}({})", columns.len()))
                .collect(),
            output: Some(output),
            error: None,
        })
    }
}

/// The explicit file list, or the data files in `dir` (created if missing).
fn files_or_dir(files: &[PathBuf], dir: &Path) -> Result<Vec<PathBuf>> {
    if !files.is_empty() {
        return Ok(files.to_vec());
    }
    info!(dir = %dir.display(), "Looking for files");
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    list_data_files(dir).with_context(|| format!("list {}", dir.display()))
}
