use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::output::{stage, write_atomic, StagedFile};
use crate::ring_buffer::{Extraction, RingBufferControl};

/// JSON summary of one extraction, for attaching to bug reports
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    /// Symbol the control structure was found through
    pub symbol: String,
    /// Address of the control structure, as hex
    pub control_address: String,
    /// Address of the backing array, as hex
    pub buffer_address: String,
    /// Raw decoded control fields
    pub control: RingBufferControl,
    /// Bytes recovered
    pub stored_size: usize,
    /// Physical offset the unread region starts at
    pub start: i64,
    /// Whether the unread region wrapped around the end of the array
    pub wrapped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl ExtractionReport {
    #[must_use]
    pub fn new(symbol: &str, extraction: &Extraction, output: Option<&Path>) -> Self {
        Self {
            symbol: symbol.to_string(),
            control_address: extraction.control_address.to_string(),
            buffer_address: extraction.control.buffer_address().to_string(),
            control: extraction.control,
            stored_size: extraction.stored_size(),
            start: extraction.control.start_offset(),
            wrapped: extraction.wrapped,
            output: output.map(Path::to_path_buf),
        }
    }

    /// Serialize the report as pretty JSON
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self).context("Failed to serialize report")?;
        writeln!(writer)?;
        Ok(())
    }

    /// Atomically write the report to `path`
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, |file| self.write_to(file))
    }

    /// Write the report next to `path` without replacing it yet
    ///
    /// # Errors
    /// Returns an error if the temporary file cannot be created or written
    pub fn stage(&self, path: &Path) -> Result<StagedFile> {
        stage(path, |file| self.write_to(file))
    }
}
