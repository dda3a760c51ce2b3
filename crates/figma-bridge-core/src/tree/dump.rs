//! Development-mode payload dumps for offline inspection.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Best-effort sink: writes pretty JSON into a directory, never fails the caller.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticDump {
    dir: Option<PathBuf>,
}

impl DiagnosticDump {
    /// Dumps go to `dir`; `None` disables dumping.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Write `value` to `<dir>/<file_name>`. Errors are logged and swallowed.
    pub async fn write<T: Serialize>(&self, file_name: &str, value: &T) {
        let Some(dir) = &self.dir else {
            return;
        };
        let path = dir.join(file_name);
        if let Err(e) = write_pretty(dir, &path, value).await {
            tracing::warn!("could not write diagnostic dump {}: {:#}", path.display(), e);
        }
    }
}

async fn write_pretty<T: Serialize>(dir: &Path, path: &Path, value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, text).await?;
    Ok(())
}
