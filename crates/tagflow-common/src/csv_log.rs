//! Append-only CSV log files.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;

/// A CSV file that only ever grows by one row at a time.
///
/// The header is written when the file is first created (or found empty);
/// an existing file is never rewritten.
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
    header: &'static [&'static str],
}

impl CsvLog {
    pub fn new(path: impl Into<PathBuf>, header: &'static [&'static str]) -> Self {
        Self {
            path: path.into(),
            header,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file (and its parent directory) with a header row if it
    /// does not exist yet.
    pub fn initialize(&self) -> csv::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let needs_header = !matches!(fs::metadata(&self.path), Ok(meta) if meta.len() > 0);
        if needs_header {
            let mut writer = WriterBuilder::new().from_path(&self.path)?;
            writer.write_record(self.header)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Append one row, initializing the file first when needed.
    pub fn append<I, S>(&self, row: I) -> csv::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.initialize()?;
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(row)?;
        writer.flush()?;
        Ok(())
    }
}
