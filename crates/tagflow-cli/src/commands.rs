use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use tagflow_cli::pipeline::{TransformStage, extract_files, route_paths};
use tagflow_cli::types::BatchResult;
use tagflow_ingest::{PipelineConfig, RouteSummary};
use tagflow_rules::Ruleset;

use crate::cli::PathArgs;
use crate::summary::apply_table_style;

/// Config file (or defaults), then flag overrides, then relative paths
/// resolved against `--base-dir`.
pub fn resolve_config(args: &PathArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_path(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let overrides = [
        (&args.ruleset, &mut config.ruleset_path),
        (&args.raw_dir, &mut config.raw_dir),
        (&args.processed_dir, &mut config.processed_dir),
        (&args.enriched_dir, &mut config.enriched_dir),
        (&args.audit_log, &mut config.audit_log_path),
    ];
    for (flag, target) in overrides {
        if let Some(path) = flag {
            *target = path.clone();
        }
    }
    Ok(config.rebase(&args.base_dir))
}

pub fn run_route(config: &PipelineConfig, paths: &[PathBuf]) -> Result<RouteSummary> {
    route_paths(config, paths)
}

pub fn run_extract(config: &PipelineConfig, files: &[PathBuf]) -> Result<BatchResult> {
    extract_files(config, files)
}

pub fn run_transform(config: &PipelineConfig, files: &[PathBuf]) -> Result<BatchResult> {
    let stage = TransformStage::from_config(config)?;
    info!(
        tags = stage.ruleset().tags.len(),
        ruleset = %config.ruleset_path.display(),
        "Loaded ruleset"
    );
    stage.run(files)
}

/// Extract every raw file, then transform every processed file.
pub fn run_all(config: &PipelineConfig) -> Result<(BatchResult, BatchResult)> {
    let stage = TransformStage::from_config(config)?;
    let extracted = extract_files(config, &[])?;
    let transformed = stage.run(&[])?;
    Ok((extracted, transformed))
}

pub fn run_tags(config: &PipelineConfig) -> Result<()> {
    let ruleset = Ruleset::from_path(&config.ruleset_path)
        .with_context(|| format!("load ruleset {}", config.ruleset_path.display()))?;
    let mut table = Table::new();
    table.set_header(vec!["Tag", "Keywords", "Kinds", "Description"]);
    apply_table_style(&mut table);
    for tag in &ruleset.tags {
        let kinds = if tag.allowed_kinds.is_empty() {
            "any".to_string()
        } else {
            tag.allowed_kinds
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.add_row(vec![
            tag.name.clone(),
            tag.keywords.join(", "),
            kinds,
            tag.description.clone().unwrap_or_default(),
        ]);
    }
    println!("{table}");
    Ok(())
}
