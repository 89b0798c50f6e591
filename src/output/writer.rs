//! CSV output
//!
//! One `token,count` record per row, no header, RFC 4180 quoting. The target
//! file is truncated on open, so every run overwrites the previous table.

use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{FreqError, Result};
use crate::frequency::FrequencyRows;

/// Output file used when nothing else is configured.
pub const DEFAULT_OUTPUT_PATH: &str = "freq.csv";

/// Writes rows to a CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFrequencyWriter {
    path: PathBuf,
}

impl Default for CsvFrequencyWriter {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_PATH)
    }
}

impl CsvFrequencyWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `rows` to the configured path, replacing its contents.
    pub fn write_rows(&self, rows: &FrequencyRows) -> Result<()> {
        let file = std::fs::File::create(&self.path).map_err(|e| FreqError::io(&self.path, e))?;
        write_csv(file, rows)?;
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "wrote frequency table");
        Ok(())
    }
}

/// Serialize `rows` as headerless `token,count` CSV into any writer.
pub fn write_csv<W: io::Write>(sink: W, rows: &FrequencyRows) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(sink);
    for row in rows.iter() {
        wtr.write_record([row.token.as_str(), row.count.to_string().as_str()])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Render rows to an in-memory CSV string.
pub fn to_csv_string(rows: &FrequencyRows) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, rows)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
