use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// A fully written temporary file waiting to be moved to its destination.
///
/// Dropping an uncommitted `StagedFile` removes the temporary file, so a
/// failed run never leaves partial outputs behind.
#[derive(Debug)]
pub struct StagedFile {
    tmp: NamedTempFile,
    dest: PathBuf,
}

impl StagedFile {
    /// Create the temporary file in the destination directory, creating that
    /// directory if needed, and fill it with `write`.
    pub fn create<F>(dest: &Path, write: F) -> Result<Self>
    where
        F: FnOnce(&mut BufWriter<&mut std::fs::File>) -> Result<()>,
    {
        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let stem = dest
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let mut tmp = tempfile::Builder::new()
            .prefix(&format!(".{}_", stem))
            .suffix(".partial")
            .tempfile_in(&dir)?;

        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            write(&mut writer)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;

        debug!("Staged {:?} at {:?}", dest, tmp.path());
        Ok(Self {
            tmp,
            dest: dest.to_path_buf(),
        })
    }

    /// Atomically replace the destination with the staged content.
    pub fn commit(self) -> Result<PathBuf> {
        self.tmp
            .persist(&self.dest)
            .map_err(|e| Error::Io(e.error))?;
        Ok(self.dest)
    }
}

/// Commit every staged file, in order.
///
/// If one commit fails, files already moved into place by this call are
/// removed again and the remaining stages are dropped. A destination that
/// existed before the call and was replaced cannot be restored.
pub fn commit_all(staged: Vec<StagedFile>) -> Result<Vec<PathBuf>> {
    let mut committed = Vec::with_capacity(staged.len());
    for file in staged {
        match file.commit() {
            Ok(path) => committed.push(path),
            Err(e) => {
                for path in &committed {
                    if let Err(err) = std::fs::remove_file(path) {
                        warn!("Could not remove {:?} after failed commit: {}", path, err);
                    }
                }
                return Err(e);
            }
        }
    }
    Ok(committed)
}
