//! Pipeline folder layout.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};
use crate::router::RouterConfig;

/// Paths used by every pipeline stage (persisted as TOML).
///
/// Relative paths are resolved against a base directory with
/// [`PipelineConfig::rebase`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Routed data files.
    pub raw_dir: PathBuf,
    /// Extracted `{metadata, data}` envelopes.
    pub processed_dir: PathBuf,
    /// Enriched payloads.
    pub enriched_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub assignment_path: PathBuf,
    /// Semantic tag ruleset (YAML or JSON).
    pub ruleset_path: PathBuf,
    pub audit_log_path: PathBuf,
    pub router_log_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            processed_dir: PathBuf::from("data/processed"),
            enriched_dir: PathBuf::from("data/enriched"),
            docs_dir: PathBuf::from("docs"),
            assignment_path: PathBuf::from("assignment.md"),
            ruleset_path: PathBuf::from("config/tags.yaml"),
            audit_log_path: PathBuf::from("logs/transformation_log.csv"),
            router_log_path: PathBuf::from("logs/router_log.csv"),
        }
    }
}

impl PipelineConfig {
    /// Load a config file. Missing keys take their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| IngestError::read(path, e))?;
        toml::from_str(&contents).map_err(|e| IngestError::Config {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Resolve every relative path against `base`.
    pub fn rebase(mut self, base: &Path) -> Self {
        for path in [
            &mut self.raw_dir,
            &mut self.processed_dir,
            &mut self.enriched_dir,
            &mut self.docs_dir,
            &mut self.assignment_path,
            &mut self.ruleset_path,
            &mut self.audit_log_path,
            &mut self.router_log_path,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            raw_dir: self.raw_dir.clone(),
            docs_dir: self.docs_dir.clone(),
            assignment_path: self.assignment_path.clone(),
            log_path: self.router_log_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
raw_dir = "/srv/uploads"
ruleset_path = "rules/tags.json"
"#,
        )
        .unwrap();
        assert_eq!(config.raw_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.ruleset_path, PathBuf::from("rules/tags.json"));
        assert_eq!(config.processed_dir, PathBuf::from("data/processed"));
    }

    #[test]
    fn test_rebase_only_touches_relative_paths() {
        let config = PipelineConfig {
            raw_dir: PathBuf::from("/srv/uploads"),
            ..PipelineConfig::default()
        }
        .rebase(Path::new("/work"));
        assert_eq!(config.raw_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(
            config.audit_log_path,
            PathBuf::from("/work/logs/transformation_log.csv")
        );
        assert_eq!(
            config.router_config().log_path,
            PathBuf::from("/work/logs/router_log.csv")
        );
    }

    #[test]
    fn test_unknown_key_is_accepted() {
        let config: PipelineConfig = toml::from_str("extra = 1\n").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_bad_type_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagflow.toml");
        std::fs::write(&path, "raw_dir = 3\n").unwrap();
        assert!(matches!(
            PipelineConfig::from_path(&path),
            Err(IngestError::Config { .. })
        ));
    }
}
