//! Tracing setup for the CLI.
//!
//! Events go to `$XDG_STATE_HOME/figma-bridge/figma-bridge.log`; when that file
//! cannot be opened the caller falls back to stderr. Stdout carries command
//! output only and never receives log lines.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,figma_bridge_core=debug,figma_bridge=debug";
const LOG_FILE: &str = "figma-bridge.log";

/// `RUST_LOG` when set and valid, else the crate defaults.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn install(writer: BoxMakeWriter) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(filter_from(rust_log.as_deref()))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install tracing subscriber: {}", e))
}

/// Log file location (parent directory created on demand).
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("figma-bridge")?;
    xdg_dirs
        .place_state_file(LOG_FILE)
        .context("create log directory")
}

fn open_log(path: &Path) -> Result<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

/// Log to the XDG state file. Errors leave no subscriber installed so the
/// caller can try `init_logging_stderr`.
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let file = open_log(&path)?;
    install(BoxMakeWriter::new(Mutex::new(file)))?;
    tracing::info!("figma-bridge logging to {}", path.display());
    Ok(())
}

/// Stderr-only fallback. A subscriber that is already installed is kept.
pub fn init_logging_stderr() {
    let _ = install(BoxMakeWriter::new(io::stderr));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_enables_crate_debug() {
        let filter = filter_from(None).to_string();
        assert!(filter.contains("figma_bridge_core=debug"));
        assert!(filter.contains("info"));
    }

    #[test]
    fn explicit_directives_win() {
        assert_eq!(filter_from(Some("warn")).to_string(), "warn");
    }

    #[test]
    fn open_log_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        std::fs::write(&path, b"first\n").unwrap();
        {
            use std::io::Write;
            let mut f = open_log(&path).unwrap();
            f.write_all(b"second\n").unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn open_log_reports_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_log(&dir.path().join("missing/figma-bridge.log")).unwrap_err();
        assert!(err.to_string().contains("open log file"));
    }
}
