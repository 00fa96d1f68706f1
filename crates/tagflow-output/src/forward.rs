//! Writing envelopes and enriched payloads as JSON files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use tagflow_model::EnrichedPayload;

use crate::common::{ensure_parent_dir, json_output_path};

/// Write `document` as pretty JSON to `<dir>/<stem>.json`, creating `dir`.
///
/// Returns the path written. An existing file is replaced.
pub fn write_json<T: Serialize>(
    document: &T,
    original_filename: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let path = json_output_path(dir, original_filename);
    ensure_parent_dir(&path)?;

    let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)
        .with_context(|| format!("serialize {}", path.display()))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// Forward an enriched payload to the enriched directory.
pub fn forward_payload(
    payload: &EnrichedPayload,
    original_filename: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let path = write_json(payload, original_filename, dir)?;
    info!(
        path = %path.display(),
        rows = payload.data.len(),
        "Forwarded enriched payload"
    );
    Ok(path)
}
