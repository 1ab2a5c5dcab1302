//! Shared helpers for output writers.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Output files staged as temporaries and persisted together.
///
/// Each staged file is fully written to a temporary sibling of its target.
/// Nothing appears at a target path until [`OutputBatch::commit`], and a
/// batch dropped before commit removes its temporaries.
#[derive(Debug, Default)]
pub struct OutputBatch {
    staged: Vec<(PathBuf, NamedTempFile)>,
}

impl OutputBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one output into a temporary file next to `path`.
    pub fn stage<F>(&mut self, path: &Path, write: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        if path.is_dir() {
            bail!("output path {} is a directory", path.display());
        }
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;

        let temp = NamedTempFile::new_in(parent)
            .with_context(|| format!("create temporary file in {}", parent.display()))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            write(&mut writer)?;
            writer
                .flush()
                .with_context(|| format!("write {}", path.display()))?;
        }
        debug!(path = %path.display(), "output staged");
        self.staged.push((path.to_path_buf(), temp));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Move every staged file into place, in staging order.
    ///
    /// If one rename fails, the files already moved by this commit are
    /// removed and the remaining temporaries are dropped. Files that existed
    /// before the commit are not restored.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut persisted: Vec<PathBuf> = Vec::with_capacity(self.staged.len());
        for (path, temp) in self.staged {
            if let Err(error) = temp.persist(&path) {
                for done in &persisted {
                    if let Err(remove_error) = fs::remove_file(done) {
                        warn!(path = %done.display(), error = %remove_error, "rollback failed");
                    }
                }
                return Err(error).with_context(|| format!("persist {}", path.display()));
            }
            persisted.push(path);
        }
        Ok(persisted)
    }
}

/// Write `path` through a temporary file in the same directory.
///
/// The temporary file is renamed over `path` only after `write` succeeds, so a
/// failed run never leaves a partial file behind.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let mut batch = OutputBatch::new();
    batch.stage(path, write)?;
    batch.commit()?;
    Ok(())
}
