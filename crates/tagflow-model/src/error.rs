use thiserror::Error;

/// Errors raised while parsing model values from configuration strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unrecognized column kind '{0}'")]
    UnknownKind(String),
    #[error("unrecognized normalization method '{0}' (expected 'min-max' or 'z-score')")]
    UnknownMethod(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
