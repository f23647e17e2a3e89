//! Tracing setup for the CLI: an append-only log file next to the run state,
//! or stderr when that file cannot be opened.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,mirrorsync=debug";
const LOG_FILE: &str = "mirrorsync.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `$XDG_STATE_HOME/mirrorsync`, shared with the state file.
pub fn default_log_dir() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mirrorsync")?;
    Ok(xdg_dirs.get_state_home().join("mirrorsync"))
}

/// Create `dir` if needed and open its log file for appending.
pub fn open_log_file(dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;
    Ok((file, path))
}

/// Install a file subscriber under [`default_log_dir`]. On error nothing is
/// installed and the caller may fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let (file, path) = open_log_file(&default_log_dir()?)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {e}"))?;

    tracing::info!(log = %path.display(), "logging initialized");
    Ok(())
}

/// Stderr-only subscriber. A second install is ignored.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
