//! Writing output artifacts without ever leaving a partial file behind
//!
//! Content goes to a temporary file next to the destination and is renamed
//! into place only once it has been fully written. If anything fails the
//! temporary file is removed when it is dropped.
//!
//! Several outputs that belong together are staged first and committed only
//! once every one of them has been written.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Fully written content waiting to be renamed onto its destination
#[derive(Debug)]
pub struct StagedFile {
    tmp: NamedTempFile,
    path: PathBuf,
}

impl StagedFile {
    /// Destination the file will be renamed to
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the staged content onto its destination
    ///
    /// # Errors
    /// Returns an error if the rename fails
    pub fn commit(self) -> Result<()> {
        let path = self.path;
        self.tmp
            .persist(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// Write whatever `write` produces to a temporary file next to `path`
///
/// Nothing at `path` changes until [`StagedFile::commit`] is called.
///
/// # Errors
/// Returns an error if the temporary file cannot be created or written
pub fn stage<F>(path: &Path, write: F) -> Result<StagedFile>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    write(&mut tmp)?;
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all().context("Failed to sync output file")?;

    Ok(StagedFile { tmp, path: path.to_path_buf() })
}

/// Stage `bytes` for `path`
///
/// # Errors
/// See [`stage`]
pub fn stage_bytes(path: &Path, bytes: &[u8]) -> Result<StagedFile> {
    stage(path, |file| {
        file.write_all(bytes).context("Failed to write output data")?;
        Ok(())
    })
}

/// Atomically replace `path` with whatever `write` produces
///
/// # Errors
/// Returns an error if the temporary file cannot be created, written or
/// renamed onto `path`
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    stage(path, write)?.commit()
}

/// Atomically write `bytes` to `path`
///
/// # Errors
/// See [`write_atomic`]
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    stage_bytes(path, bytes)?.commit()
}
