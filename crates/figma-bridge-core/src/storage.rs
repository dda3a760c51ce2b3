//! Temp-file storage for downloaded assets.
//!
//! Bytes land in `<name>.part` and are renamed into place only after a
//! successful transfer, so a failed download never leaves a truncated image
//! under the final name.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
#[cfg(unix)]
use std::os::unix::fs::FileExt;

/// Appended to the final file name while a download is in flight.
pub const TEMP_SUFFIX: &str = ".part";

/// Temp path used while downloading into `final_path`.
pub fn temp_path_for(final_path: &Path) -> PathBuf {
    let mut name = final_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(TEMP_SUFFIX);
    final_path.with_file_name(name)
}

/// Writer for a temp download file. Clones share the same file handle.
#[derive(Clone)]
pub struct StorageWriter {
    file: Arc<File>,
    temp_path: PathBuf,
}

impl StorageWriter {
    /// Create (or truncate) the temp file at `temp_path`.
    pub fn create(temp_path: &Path) -> Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(StorageWriter {
            file: Arc::new(file),
            temp_path: temp_path.to_path_buf(),
        })
    }

    /// Write `data` at `offset`. Does not move the file cursor.
    #[cfg(unix)]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> Result<()> {
        self.file
            .write_all_at(data, offset)
            .context("storage write_at failed")?;
        Ok(())
    }

    /// Seek + write fallback for non-Unix targets.
    #[cfg(not(unix))]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> Result<()> {
        use std::io::{Seek, SeekFrom, Write};
        let mut f = (*self.file).try_clone()?;
        f.seek(SeekFrom::Start(offset))?;
        f.write_all(data)?;
        Ok(())
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all().context("storage sync failed")?;
        Ok(())
    }

    /// Rename the temp file to `final_path`, replacing any previous file there.
    /// The temp file is removed if the rename fails.
    /// Consumes the writer; other clones must already be dropped.
    pub fn finalize(self, final_path: &Path) -> Result<()> {
        let temp_path = self.temp_path.clone();
        drop(self.file);

        if let Err(e) = std::fs::rename(&temp_path, final_path) {
            remove_temp(&temp_path);
            return Err(anyhow::Error::new(e).context(format!(
                "failed to rename {} to {}",
                temp_path.display(),
                final_path.display()
            )));
        }
        Ok(())
    }

    /// Remove the temp file after a failed transfer. Best-effort.
    pub fn discard(self) {
        let temp_path = self.temp_path.clone();
        drop(self.file);
        remove_temp(&temp_path);
    }
}

/// Best-effort removal of a leftover temp file.
pub fn remove_temp(temp_path: &Path) {
    if let Err(e) = std::fs::remove_file(temp_path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!("could not remove {}: {}", temp_path.display(), e);
        }
    }
}
