use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// In-flight files carry this hidden prefix; the folder watch ignores
/// dot-prefixed names, so partial artifacts never show up in progress.
const TEMP_PREFIX: &str = ".artifact-";

/// Creates the artifact directory if needed and probes that it is writable.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(PersistError::OutputDir("path is not a directory".into())),
        Err(_) => {
            fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        }
    }
    Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes artifacts so they appear in the destination folder all at once.
///
/// Content goes to a hidden temp file first, is flushed and fsynced, then
/// renamed into place. The folder watch treats that rename as the completion
/// event, so a half-written artifact is never observable under its final
/// name.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Writes `content` and returns the final path. Takes raw bytes so
    /// renderers producing binary formats can reuse the same writer.
    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let mut tmp = Builder::new().prefix(TEMP_PREFIX).tempfile_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Re-runs overwrite: drop any previous artifact under this name so
        // the rename lands cleanly on every platform.
        let target = self.dir.join(filename);
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
