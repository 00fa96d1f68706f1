//! Shared path helpers for output files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}

/// `<dir>/<stem>.json` for a source file name such as `customers.csv`.
pub fn json_output_path(dir: &Path, original_filename: &str) -> PathBuf {
    let stem = Path::new(original_filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| original_filename.to_string());
    dir.join(format!("{stem}.json"))
}
