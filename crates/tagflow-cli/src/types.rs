use std::path::{Path, PathBuf};

/// Outcome of one file in an extraction or transformation batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub path: PathBuf,
    pub filename: String,
    /// Rows of the written table.
    pub rows: usize,
    /// Columns of the written table.
    pub columns: usize,
    pub tagged_columns: usize,
    /// `kind(columns)` for each transformation that changed something.
    pub transformations: Vec<String>,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
}

impl FileResult {
    pub fn failed(path: &Path, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            filename: file_name(path),
            rows: 0,
            columns: 0,
            tagged_columns: 0,
            transformations: Vec::new(),
            output: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Results of one stage over a set of files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub files: Vec<FileResult>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.is_success()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.succeeded() < self.total()
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
