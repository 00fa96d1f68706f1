use std::path::PathBuf;

use tagflow_model::ModelError;

/// Errors raised while loading a ruleset.
///
/// All of these are fatal: a run never starts with an invalid ruleset.
#[derive(Debug, thiserror::Error)]
pub enum RulesetError {
    #[error("failed to read ruleset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported ruleset file {path} (expected .yaml, .yml or .json)")]
    UnsupportedExtension { path: PathBuf },

    #[error("failed to parse YAML ruleset: {source}")]
    Yaml {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON ruleset: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("tag '{tag}': {source}")]
    UnknownKind {
        tag: String,
        #[source]
        source: ModelError,
    },

    #[error("numeric_normalization: {source}")]
    UnknownMethod {
        #[source]
        source: ModelError,
    },

    #[error("numeric_normalization: range must be two finite numbers, got {found:?}")]
    InvalidRange { found: Vec<f64> },

    #[error("date_standardization: invalid target format '{format}'")]
    InvalidDateFormat { format: String },

    #[error("one_hot_encoding: max_categories must be at least 1")]
    InvalidMaxCategories,
}

impl RulesetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RulesetError>;
