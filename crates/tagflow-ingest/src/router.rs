//! Routing of uploaded files into the pipeline's folder layout.
//!
//! Each file is copied by extension:
//! - `.csv`, `.xlsx`, `.xls` into the raw data directory
//! - `.md`, `.txt` onto the assignment file
//! - `.pdf` into the docs directory, flagged for parsing
//!
//! Every attempt on an existing file is appended to the router log. A file
//! that already is its own destination is left alone.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use tagflow_common::CsvLog;

use crate::discovery::walk_files;
use crate::error::{IngestError, Result};

/// Router log columns.
pub const ROUTER_LOG_HEADER: &[&str] = &["timestamp", "action", "source", "destination", "status"];

const ROUTER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Destinations for routed files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    pub raw_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub assignment_path: PathBuf,
    pub log_path: PathBuf,
}

/// What a routed file is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Tabular data for extraction.
    Data,
    /// The assignment brief.
    Assignment,
    /// Reference documents.
    Document,
}

impl RouteKind {
    /// Classify a path by extension (case-insensitive).
    pub fn for_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "xlsx" | "xls" => Some(RouteKind::Data),
            "md" | "txt" => Some(RouteKind::Assignment),
            "pdf" => Some(RouteKind::Document),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Data => "data",
            RouteKind::Assignment => "assignment",
            RouteKind::Document => "document",
        }
    }

    /// Where a file with this kind is copied to. For directory targets the
    /// second element is the directory itself.
    fn target(self, config: &RouterConfig, source: &Path) -> (PathBuf, PathBuf) {
        let dir_target = |dir: &Path| match source.file_name() {
            Some(name) => (dir.join(name), dir.to_path_buf()),
            None => (dir.to_path_buf(), dir.to_path_buf()),
        };
        match self {
            RouteKind::Data => dir_target(&config.raw_dir),
            RouteKind::Document => dir_target(&config.docs_dir),
            RouteKind::Assignment => (
                config.assignment_path.clone(),
                config.assignment_path.clone(),
            ),
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStatus {
    Success,
    Failed,
    Skipped,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Success => "success",
            RouteStatus::Failed => "failed",
            RouteStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of routing one file.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOutcome {
    pub status: RouteStatus,
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub kind: Option<RouteKind>,
    /// Set for documents that a later stage may parse.
    pub parse_flag: bool,
    pub message: String,
}

/// Overall status of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Success,
    PartialSuccess,
    Failed,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Success => "success",
            BatchStatus::PartialSuccess => "partial_success",
            BatchStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcomes of routing several files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteSummary {
    pub outcomes: Vec<RouteOutcome>,
}

impl RouteSummary {
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successful(&self) -> usize {
        self.count(RouteStatus::Success)
    }

    pub fn failed(&self) -> usize {
        self.count(RouteStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(RouteStatus::Skipped)
    }

    /// `Failed` only when something failed and nothing succeeded.
    pub fn status(&self) -> BatchStatus {
        match (self.failed(), self.successful()) {
            (0, _) => BatchStatus::Success,
            (_, 0) => BatchStatus::Failed,
            _ => BatchStatus::PartialSuccess,
        }
    }

    fn count(&self, status: RouteStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

/// Copies files into place and records each attempt.
#[derive(Debug, Clone)]
pub struct Router {
    config: RouterConfig,
    log: CsvLog,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        let log = CsvLog::new(config.log_path.clone(), ROUTER_LOG_HEADER);
        Self { config, log }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Route a single file.
    ///
    /// Routing problems come back as a failed or skipped outcome; `Err` means
    /// the router log could not be written.
    pub fn route_file(&self, path: &Path) -> Result<RouteOutcome> {
        if !path.is_file() {
            warn!(path = %path.display(), "File does not exist");
            return Ok(RouteOutcome {
                status: RouteStatus::Failed,
                source: path.to_path_buf(),
                destination: None,
                kind: None,
                parse_flag: false,
                message: "File does not exist".to_string(),
            });
        }

        let Some(kind) = RouteKind::for_path(path) else {
            let ext = path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
                .unwrap_or_default();
            let status = format!("unsupported file type: {ext}");
            self.record("skip", path, Path::new(""), &status)?;
            return Ok(RouteOutcome {
                status: RouteStatus::Skipped,
                source: path.to_path_buf(),
                destination: None,
                kind: None,
                parse_flag: false,
                message: status,
            });
        };

        let (destination, dir) = kind.target(&self.config, path);
        if is_same_file(path, &destination) {
            let status = "already in place";
            self.record("skip", path, &destination, status)?;
            return Ok(RouteOutcome {
                status: RouteStatus::Skipped,
                source: path.to_path_buf(),
                destination: Some(destination),
                kind: Some(kind),
                parse_flag: false,
                message: status.to_string(),
            });
        }
        match copy_into(path, &destination) {
            Ok(()) => {
                self.record("copy", path, &destination, "success")?;
                Ok(RouteOutcome {
                    status: RouteStatus::Success,
                    source: path.to_path_buf(),
                    destination: Some(destination),
                    kind: Some(kind),
                    parse_flag: kind == RouteKind::Document,
                    message: format!("copied as {kind}"),
                })
            }
            Err(err) => {
                let message = err.to_string();
                self.record("copy", path, &dir, &format!("failed: {message}"))?;
                Ok(RouteOutcome {
                    status: RouteStatus::Failed,
                    source: path.to_path_buf(),
                    destination: None,
                    kind: Some(kind),
                    parse_flag: false,
                    message,
                })
            }
        }
    }

    /// Route each path in order.
    pub fn route_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<RouteSummary> {
        let mut summary = RouteSummary::default();
        for path in paths {
            summary.outcomes.push(self.route_file(path.as_ref())?);
        }
        info!(
            processed = summary.processed(),
            successful = summary.successful(),
            failed = summary.failed(),
            skipped = summary.skipped(),
            "Routing finished"
        );
        Ok(summary)
    }

    /// Route every file under `dir`, including subdirectories.
    pub fn route_directory(&self, dir: &Path) -> Result<RouteSummary> {
        let files = walk_files(dir)?;
        self.route_files(&files)
    }

    fn record(&self, action: &str, source: &Path, destination: &Path, status: &str) -> Result<()> {
        let timestamp = Local::now().format(ROUTER_TIMESTAMP_FORMAT).to_string();
        let source_text = source.display().to_string();
        let destination_text = destination.display().to_string();
        info!(action, source = %source_text, destination = %destination_text, status, "Routed file");
        self.log
            .append([
                timestamp.as_str(),
                action,
                source_text.as_str(),
                destination_text.as_str(),
                status,
            ])
            .map_err(|source| IngestError::Log {
                path: self.log.path().to_path_buf(),
                source,
            })
    }
}

/// True when both paths resolve to the same existing file.
fn is_same_file(source: &Path, destination: &Path) -> bool {
    match (source.canonicalize(), destination.canonicalize()) {
        (Ok(source), Ok(destination)) => source == destination,
        _ => false,
    }
}

fn copy_into(source: &Path, destination: &Path) -> std::io::Result<()> {
    if let Some(parent) = destination.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(source, destination)?;
    Ok(())
}
